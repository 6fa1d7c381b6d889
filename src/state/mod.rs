pub mod controller;
pub mod session;
pub mod store;

pub use controller::{Outcome, Rejection, SessionController};
pub use session::{GameSession, SessionPhase};
pub use store::{spawn_session_sweeper, SessionGuard, SessionStore};

use crate::text::Messages;
use crate::types::GameConfig;
use crate::words::WordSource;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub controller: Arc<SessionController>,
}

impl AppState {
    pub fn new(config: GameConfig, words: Arc<dyn WordSource>, messages: Messages) -> Self {
        Self {
            sessions: Arc::new(SessionStore::new()),
            controller: Arc::new(SessionController::new(config, words, messages)),
        }
    }

    pub fn messages(&self) -> &Messages {
        self.controller.messages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Locale;
    use crate::words::WordBank;

    #[tokio::test]
    async fn test_new_state_is_empty() {
        let state = AppState::new(
            GameConfig::default(),
            Arc::new(WordBank::new(["apple", "river"]).unwrap()),
            Messages::new(Locale::En),
        );

        assert!(state.sessions.is_empty().await);
        assert_eq!(state.controller.word_count(), 2);
        assert_eq!(state.messages().locale(), Locale::En);
    }

    #[tokio::test]
    async fn test_clones_share_sessions() {
        let state = AppState::new(
            GameConfig::default(),
            Arc::new(WordBank::new(["apple"]).unwrap()),
            Messages::default(),
        );
        let other = state.clone();

        state.sessions.get_or_create(1).await;
        assert_eq!(other.sessions.len().await, 1);
    }
}
