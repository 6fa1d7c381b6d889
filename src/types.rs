use std::str::FromStr;
use std::time::Duration;

/// Platform identifiers
pub type ChatId = i64;
pub type UserId = u64;

/// A participant acting on a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub name: String,
}

impl Actor {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// How a guess is compared against the secret word. Both modes ignore case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// The trimmed guess must equal the word
    #[default]
    Exact,
    /// The guess must contain the word somewhere
    Contains,
}

impl MatchMode {
    pub fn matches(&self, secret: &str, guess: &str) -> bool {
        let secret = secret.trim().to_lowercase();
        if secret.is_empty() {
            return false;
        }
        let guess = guess.trim().to_lowercase();

        match self {
            MatchMode::Exact => guess == secret,
            MatchMode::Contains => guess.contains(&secret),
        }
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(MatchMode::Exact),
            "contains" | "substring" => Ok(MatchMode::Contains),
            other => Err(format!("unknown match mode '{}'", other)),
        }
    }
}

/// Timing gates and matching policy shared by every chat
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Minimum time between two game starts in the same chat
    pub restart_cooldown: Duration,
    /// Window after a win during which only the winner may take over hosting
    pub winner_grace: Duration,
    pub match_mode: MatchMode,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            restart_cooldown: Duration::from_secs(180),
            winner_grace: Duration::from_secs(5),
            match_mode: MatchMode::Exact,
        }
    }
}
