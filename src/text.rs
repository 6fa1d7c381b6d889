//! User-facing texts. Chat messages are rendered as Telegram HTML.

use crate::protocol::{Button, ControlAction, Controls};
use crate::state::controller::Rejection;
use crate::types::{Actor, GameConfig};
use std::str::FromStr;
use std::time::Duration;
use teloxide::utils::html;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Kk,
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kk" | "kz" => Ok(Locale::Kk),
            "en" => Ok(Locale::En),
            other => Err(format!("unsupported locale '{}'", other)),
        }
    }
}

/// Clickable mention of a participant
pub fn mention(actor: &Actor) -> String {
    format!(
        "<a href=\"tg://user?id={}\">{}</a>",
        actor.id,
        html::escape(&actor.name)
    )
}

/// Round a duration up to whole seconds
fn whole_seconds(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

#[derive(Debug, Clone, Default)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Plain-text trigger that starts a game besides the /start command
    pub fn start_keyword(&self) -> &'static str {
        match self.locale {
            Locale::Kk => "Баста",
            Locale::En => "Start",
        }
    }

    pub fn is_start_keyword(&self, text: &str) -> bool {
        text.trim().to_lowercase() == self.start_keyword().to_lowercase()
    }

    fn format_duration(&self, duration: Duration) -> String {
        let secs = whole_seconds(duration);
        let (min, sec) = (secs / 60, secs % 60);
        let (min_unit, sec_unit) = match self.locale {
            Locale::Kk => ("мин", "сек"),
            Locale::En => ("min", "s"),
        };
        match (min, sec) {
            (0, s) => format!("{} {}", s, sec_unit),
            (m, 0) => format!("{} {}", m, min_unit),
            (m, s) => format!("{} {} {} {}", m, min_unit, s, sec_unit),
        }
    }

    pub fn game_started(&self, host: &Actor) -> String {
        match self.locale {
            Locale::Kk => format!(
                "👋 Сәлем, балапан! Кел, ойнайық!\nСөз жасыратын {}",
                mention(host)
            ),
            Locale::En => format!("👋 Let's play!\nThe word is hidden by {}", mention(host)),
        }
    }

    pub fn next_round(&self, host: &Actor) -> String {
        match self.locale {
            Locale::Kk => format!(
                "🎮 Келесі раунд басталды! Келесі сөзді {} жасырады",
                mention(host)
            ),
            Locale::En => format!("🎮 Next round! {} hides the next word", mention(host)),
        }
    }

    pub fn winner(&self, winner: &Actor, word: &str) -> String {
        match self.locale {
            Locale::Kk => format!(
                "🎉 Жеңімпаз: {}\nДұрыс жауап: <b>{}</b>",
                mention(winner),
                html::escape(word)
            ),
            Locale::En => format!(
                "🎉 Winner: {}\nThe word was: <b>{}</b>",
                mention(winner),
                html::escape(word)
            ),
        }
    }

    /// Shown privately to the host. Alerts are plain text.
    pub fn word_reveal(&self, word: &str) -> String {
        word.to_string()
    }

    pub fn rejection(&self, rejection: &Rejection) -> String {
        match (self.locale, rejection) {
            (Locale::Kk, Rejection::Cooldown { remaining }) => format!(
                "❗ Балапан, жасырылған сөзге уақыт беріледі. Жаңа ойынды {} кейін бастай аласың.",
                self.format_duration(*remaining)
            ),
            (Locale::En, Rejection::Cooldown { remaining }) => format!(
                "❗ A new game can be started in {}.",
                self.format_duration(*remaining)
            ),
            (Locale::Kk, Rejection::NotHost) => {
                "⛔ Тек жасырушы ғана бұл батырманы баса алады!".to_string()
            }
            (Locale::En, Rejection::NotHost) => "⛔ Only the host can press this button!".to_string(),
            (Locale::Kk, Rejection::WinnerGrace { remaining }) => format!(
                "⛔ Тек жеңімпаз ғана баса алады! Тағы {} күт.",
                self.format_duration(*remaining)
            ),
            (Locale::En, Rejection::WinnerGrace { remaining }) => format!(
                "⛔ Only the winner can take over right now. Try again in {}.",
                self.format_duration(*remaining)
            ),
        }
    }

    pub fn rules(&self, config: &GameConfig) -> String {
        let grace = self.format_duration(config.winner_grace);
        let cooldown = self.format_duration(config.restart_cooldown);
        match self.locale {
            Locale::Kk => format!(
                "📜 Ойын ережелері:\n\n\
                1. Бір адам \"Баста\" немесе /start арқылы ойынды бастайды, ол жасырушы болады.\n\
                2. \"Сөзді көру\" батырмасы арқылы жасырушыға сөз шығады (тек оған).\n\
                3. Қалғандары сөзді табуға тырысады, дұрыс жауап жазған адам жеңімпаз болады.\n\
                4. Жеңімпазда келесі раундта жасырушы болуға {} артықшылық бар.\n\
                5. Тек жасырушы \"Сөзді көру\" және \"Келесі сөз\" батырмаларын баса алады.\n\
                6. Жаңа ойын бастау үшін кем дегенде {} күту керек.",
                grace, cooldown
            ),
            Locale::En => format!(
                "📜 Rules:\n\n\
                1. Someone starts the game with \"Start\" or /start and becomes the host.\n\
                2. The host presses \"See word\" to privately get a word.\n\
                3. Everyone else guesses in the chat; the first correct answer wins.\n\
                4. The winner has {} of priority to become the next host.\n\
                5. Only the host can press \"See word\" and \"Next word\".\n\
                6. A new game can be started at most once every {}.",
                grace, cooldown
            ),
        }
    }

    pub fn private_chat(&self, with_invite: bool) -> String {
        let base = match self.locale {
            Locale::Kk => "Бұл ойын тек топта ойналады. Мені топқа қосыңыз 👇",
            Locale::En => "This game is played in group chats only. Add me to a group 👇",
        };
        if with_invite {
            base.to_string()
        } else {
            base.trim_end_matches(" 👇").to_string()
        }
    }

    pub fn invite_button(&self) -> &'static str {
        match self.locale {
            Locale::Kk => "🤝 Ботты чатқа қос",
            Locale::En => "🤝 Add the bot to a chat",
        }
    }

    fn button(&self, action: ControlAction) -> Button {
        let label = match (self.locale, action) {
            (Locale::Kk, ControlAction::SeeWord) => "Сөзді көру",
            (Locale::Kk, ControlAction::NextWord) => "Келесі сөз",
            (Locale::Kk, ControlAction::HideWord) => "Мен жасырамын",
            (Locale::En, ControlAction::SeeWord) => "See word",
            (Locale::En, ControlAction::NextWord) => "Next word",
            (Locale::En, ControlAction::HideWord) => "I'll hide",
        };
        Button {
            label: label.to_string(),
            action,
        }
    }

    /// Buttons under a host announcement
    pub fn host_controls(&self) -> Controls {
        vec![vec![
            self.button(ControlAction::SeeWord),
            self.button(ControlAction::NextWord),
        ]]
    }

    /// Button under a winner announcement
    pub fn winner_controls(&self) -> Controls {
        vec![vec![self.button(ControlAction::HideWord)]]
    }
}
