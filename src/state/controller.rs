//! Session transitions
//!
//! Every handler is a pure function of the current session, the acting
//! participant and the current time. It returns the next session together with
//! the effects the dispatcher has to deliver. Disallowed actions produce a
//! private notice and leave the session untouched.

use super::session::{GameSession, SessionPhase};
use crate::protocol::{AlertStyle, Effect, InboundEvent};
use crate::text::Messages;
use crate::types::*;
use crate::words::WordSource;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

/// Why an action was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("a game was started recently, {remaining:?} left")]
    Cooldown { remaining: Duration },

    #[error("only the host can do this")]
    NotHost,

    #[error("only the winner may take over for another {remaining:?}")]
    WinnerGrace { remaining: Duration },
}

/// Result of handling one event
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub session: GameSession,
    pub effects: Vec<Effect>,
    pub rejection: Option<Rejection>,
}

impl Outcome {
    fn accepted(session: GameSession, effects: Vec<Effect>) -> Self {
        Self {
            session,
            effects,
            rejection: None,
        }
    }

    fn ignored(session: &GameSession) -> Self {
        Self::accepted(session.clone(), Vec::new())
    }

    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }
}

pub struct SessionController {
    config: GameConfig,
    words: Arc<dyn WordSource>,
    messages: Messages,
}

impl SessionController {
    pub fn new(config: GameConfig, words: Arc<dyn WordSource>, messages: Messages) -> Self {
        Self {
            config,
            words,
            messages,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Route an event to its handler
    pub fn handle(
        &self,
        session: &GameSession,
        event: &InboundEvent,
        now: DateTime<Utc>,
    ) -> Outcome {
        match event {
            InboundEvent::StartGame { chat_id, actor } => {
                self.handle_start(session, *chat_id, actor, now)
            }
            InboundEvent::RevealRequest { chat_id, actor } => {
                self.handle_reveal_request(session, *chat_id, actor, now)
            }
            InboundEvent::NextWordRequest { chat_id, actor } => {
                self.handle_next_word_request(session, *chat_id, actor, now)
            }
            InboundEvent::Guess {
                chat_id,
                actor,
                text,
            } => self.handle_guess(session, *chat_id, actor, text, now),
            InboundEvent::HideAcknowledge { chat_id, actor } => {
                self.handle_hide_acknowledge(session, *chat_id, actor, now)
            }
        }
    }

    fn reject(
        &self,
        session: &GameSession,
        chat_id: ChatId,
        actor: &Actor,
        rejection: Rejection,
        style: AlertStyle,
    ) -> Outcome {
        Outcome {
            session: session.clone(),
            effects: vec![Effect::Private {
                user_id: actor.id,
                chat_id,
                text: self.messages.rejection(&rejection),
                style,
            }],
            rejection: Some(rejection),
        }
    }

    /// Start a game with the actor as host, unless one was started too recently
    pub fn handle_start(
        &self,
        session: &GameSession,
        chat_id: ChatId,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Outcome {
        if let Some(remaining) = session.cooldown_remaining(now, self.config.restart_cooldown) {
            return self.reject(
                session,
                chat_id,
                actor,
                Rejection::Cooldown { remaining },
                AlertStyle::Direct,
            );
        }

        let mut next = session.clone();
        next.start(actor.id, now);

        Outcome::accepted(
            next,
            vec![Effect::Broadcast {
                chat_id,
                text: self.messages.game_started(actor),
                controls: Some(self.messages.host_controls()),
            }],
        )
    }

    /// Give the host a fresh word. With no host yet, the requester takes the role.
    pub fn handle_reveal_request(
        &self,
        session: &GameSession,
        chat_id: ChatId,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Outcome {
        match session.host() {
            Some(host) if host != actor.id => self.reject(
                session,
                chat_id,
                actor,
                Rejection::NotHost,
                AlertStyle::Alert,
            ),
            _ => self.hide_new_word(session, chat_id, actor, now),
        }
    }

    /// Replace the live word. Needs an existing host.
    pub fn handle_next_word_request(
        &self,
        session: &GameSession,
        chat_id: ChatId,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Outcome {
        match session.host() {
            None => Outcome::ignored(session),
            Some(host) if host != actor.id => self.reject(
                session,
                chat_id,
                actor,
                Rejection::NotHost,
                AlertStyle::Alert,
            ),
            Some(_) => self.hide_new_word(session, chat_id, actor, now),
        }
    }

    fn hide_new_word(
        &self,
        session: &GameSession,
        chat_id: ChatId,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Outcome {
        let word = self.words.pick();
        let mut next = session.clone();
        next.hide_word(actor.id, word.clone(), now);

        Outcome::accepted(
            next,
            vec![Effect::Private {
                user_id: actor.id,
                chat_id,
                text: self.messages.word_reveal(&word),
                style: AlertStyle::Alert,
            }],
        )
    }

    /// Check a chat message against the live word
    pub fn handle_guess(
        &self,
        session: &GameSession,
        chat_id: ChatId,
        actor: &Actor,
        text: &str,
        now: DateTime<Utc>,
    ) -> Outcome {
        let SessionPhase::WordHidden { host, word, .. } = session.phase() else {
            return Outcome::ignored(session);
        };
        if *host == actor.id || !self.config.match_mode.matches(word, text) {
            return Outcome::ignored(session);
        }

        let mut next = session.clone();
        let Some(word) = next.record_win(actor.id, now) else {
            return Outcome::ignored(session);
        };

        Outcome::accepted(
            next,
            vec![Effect::Broadcast {
                chat_id,
                text: self.messages.winner(actor, &word),
                controls: Some(self.messages.winner_controls()),
            }],
        )
    }

    /// Take over hosting after a won round. Others must wait out the grace period.
    pub fn handle_hide_acknowledge(
        &self,
        session: &GameSession,
        chat_id: ChatId,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Outcome {
        if !matches!(session.phase(), SessionPhase::RoundWon { .. }) {
            return Outcome::ignored(session);
        }
        if let Some(remaining) = session.grace_remaining(actor.id, now, self.config.winner_grace) {
            return self.reject(
                session,
                chat_id,
                actor,
                Rejection::WinnerGrace { remaining },
                AlertStyle::Alert,
            );
        }

        let mut next = session.clone();
        next.hand_over(actor.id);

        Outcome::accepted(
            next,
            vec![Effect::Broadcast {
                chat_id,
                text: self.messages.next_round(actor),
                controls: Some(self.messages.host_controls()),
            }],
        )
    }
}
