//! Process configuration read from the environment (and `.env`)

use crate::text::Locale;
use crate::types::{GameConfig, MatchMode};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TELEGRAM_BOT_TOKEN is not set")]
    MissingBotToken,

    #[error("invalid value for {name}: '{value}' ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Read a variable, treating blank values as unset
fn var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T>(name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(name) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                name,
                reason: e.to_string(),
                value,
            }),
        None => Ok(None),
    }
}

fn secs_var(name: &'static str) -> Result<Option<Duration>, ConfigError> {
    Ok(parse_var::<u64>(name)?.map(Duration::from_secs))
}

impl GameConfig {
    /// RESTART_COOLDOWN_SECS, WINNER_GRACE_SECS and MATCH_MODE override the defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            restart_cooldown: secs_var("RESTART_COOLDOWN_SECS")?
                .unwrap_or(defaults.restart_cooldown),
            winner_grace: secs_var("WINNER_GRACE_SECS")?.unwrap_or(defaults.winner_grace),
            match_mode: parse_var::<MatchMode>("MATCH_MODE")?.unwrap_or(defaults.match_mode),
        };

        tracing::info!(
            restart_cooldown_secs = config.restart_cooldown.as_secs(),
            winner_grace_secs = config.winner_grace.as_secs(),
            match_mode = ?config.match_mode,
            "Game config loaded"
        );
        Ok(config)
    }
}

/// Everything the bot process needs besides the game rules
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub words_file: PathBuf,
    pub locale: Locale,
    /// "Add to group" link shown in private chats
    pub invite_url: Option<url::Url>,
    /// Address for the status API (disabled when unset)
    pub status_addr: Option<SocketAddr>,
    /// Evict sessions idle for this long (disabled when unset)
    pub session_idle_ttl: Option<Duration>,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = var("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::MissingBotToken)?;

        let words_file = var("WORDS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("words.txt"));

        let locale = parse_var::<Locale>("LOCALE")?.unwrap_or_default();
        let invite_url = parse_var::<url::Url>("BOT_INVITE_URL")?;
        let status_addr = parse_var::<SocketAddr>("STATUS_ADDR")?;
        let session_idle_ttl = secs_var("SESSION_IDLE_TTL_SECS")?.filter(|ttl| !ttl.is_zero());

        tracing::info!(
            words_file = %words_file.display(),
            ?locale,
            invite = invite_url.is_some(),
            ?status_addr,
            ?session_idle_ttl,
            "Bot config loaded"
        );

        Ok(Self {
            token,
            words_file,
            locale,
            invite_url,
            status_addr,
            session_idle_ttl,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "TELEGRAM_BOT_TOKEN",
        "WORDS_FILE",
        "LOCALE",
        "BOT_INVITE_URL",
        "STATUS_ADDR",
        "SESSION_IDLE_TTL_SECS",
        "RESTART_COOLDOWN_SECS",
        "WINNER_GRACE_SECS",
        "MATCH_MODE",
    ];

    fn clear_env() {
        for name in VARS {
            std::env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_game_config_defaults_from_empty_env() {
        clear_env();
        assert_eq!(GameConfig::from_env().unwrap(), GameConfig::default());
    }

    #[test]
    #[serial]
    fn test_game_config_overrides() {
        clear_env();
        std::env::set_var("RESTART_COOLDOWN_SECS", "60");
        std::env::set_var("WINNER_GRACE_SECS", " 10 ");
        std::env::set_var("MATCH_MODE", "contains");

        let config = GameConfig::from_env().unwrap();
        assert_eq!(config.restart_cooldown, Duration::from_secs(60));
        assert_eq!(config.winner_grace, Duration::from_secs(10));
        assert_eq!(config.match_mode, MatchMode::Contains);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_game_config_rejects_garbage() {
        clear_env();
        std::env::set_var("WINNER_GRACE_SECS", "soon");
        let err = GameConfig::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "WINNER_GRACE_SECS",
                ..
            }
        ));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_bot_config_requires_token() {
        clear_env();
        assert!(matches!(
            BotConfig::from_env(),
            Err(ConfigError::MissingBotToken)
        ));

        std::env::set_var("TELEGRAM_BOT_TOKEN", "   ");
        assert!(matches!(
            BotConfig::from_env(),
            Err(ConfigError::MissingBotToken)
        ));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_bot_config_defaults() {
        clear_env();
        std::env::set_var("TELEGRAM_BOT_TOKEN", "123:abc");

        let config = BotConfig::from_env().unwrap();
        assert_eq!(config.token, "123:abc");
        assert_eq!(config.words_file, PathBuf::from("words.txt"));
        assert_eq!(config.locale, Locale::Kk);
        assert!(config.invite_url.is_none());
        assert!(config.status_addr.is_none());
        assert!(config.session_idle_ttl.is_none());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_bot_config_full() {
        clear_env();
        std::env::set_var("TELEGRAM_BOT_TOKEN", "123:abc");
        std::env::set_var("WORDS_FILE", "/srv/words.txt");
        std::env::set_var("LOCALE", "en");
        std::env::set_var("BOT_INVITE_URL", "https://t.me/example_bot?startgroup=true");
        std::env::set_var("STATUS_ADDR", "127.0.0.1:8080");
        std::env::set_var("SESSION_IDLE_TTL_SECS", "86400");

        let config = BotConfig::from_env().unwrap();
        assert_eq!(config.words_file, PathBuf::from("/srv/words.txt"));
        assert_eq!(config.locale, Locale::En);
        assert_eq!(
            config.invite_url.map(|u| u.host_str().map(str::to_string)),
            Some(Some("t.me".to_string()))
        );
        assert_eq!(config.status_addr, Some("127.0.0.1:8080".parse().unwrap()));
        assert_eq!(config.session_idle_ttl, Some(Duration::from_secs(86400)));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_zero_ttl_disables_eviction() {
        clear_env();
        std::env::set_var("TELEGRAM_BOT_TOKEN", "123:abc");
        std::env::set_var("SESSION_IDLE_TTL_SECS", "0");
        assert!(BotConfig::from_env().unwrap().session_idle_ttl.is_none());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_bad_invite_url() {
        clear_env();
        std::env::set_var("TELEGRAM_BOT_TOKEN", "123:abc");
        std::env::set_var("BOT_INVITE_URL", "not a url");
        assert!(matches!(
            BotConfig::from_env(),
            Err(ConfigError::InvalidValue {
                name: "BOT_INVITE_URL",
                ..
            })
        ));
        clear_env();
    }
}
