//! Event dispatch
//!
//! Resolves the chat's session, runs the controller while holding the chat
//! lock, stores the result and hands the effects back for delivery once the
//! lock is released.

use crate::protocol::{Effect, InboundEvent};
use crate::state::AppState;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Handle an event at the current time
pub async fn handle_event(event: InboundEvent, state: &Arc<AppState>) -> Vec<Effect> {
    handle_event_at(event, state, Utc::now()).await
}

/// Handle an event at a given time
pub async fn handle_event_at(
    event: InboundEvent,
    state: &Arc<AppState>,
    now: DateTime<Utc>,
) -> Vec<Effect> {
    let chat_id = event.chat_id();
    let actor_id = event.actor().id;

    let mut session = state.sessions.lock(chat_id).await;
    let before = session.state_name();
    let outcome = state.controller.handle(&session, &event, now);

    if let Some(rejection) = &outcome.rejection {
        tracing::debug!(chat_id, actor_id, event = event.kind(), %rejection, "Rejected");
    } else if outcome.session != *session {
        tracing::info!(
            chat_id,
            actor_id,
            event = event.kind(),
            from = before,
            to = outcome.session.state_name(),
            "Session updated"
        );
    }

    *session = outcome.session;
    drop(session);

    outcome.effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::AlertStyle;
    use crate::text::{Locale, Messages};
    use crate::types::{Actor, GameConfig};
    use crate::words::WordBank;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(
            GameConfig::default(),
            Arc::new(WordBank::new(["apple"]).unwrap()),
            Messages::new(Locale::En),
        ))
    }

    #[tokio::test]
    async fn test_start_creates_session() {
        let state = state();
        let effects = handle_event(
            InboundEvent::StartGame {
                chat_id: -1,
                actor: Actor::new(1, "Alice"),
            },
            &state,
        )
        .await;

        assert_eq!(effects.len(), 1);
        assert!(matches!(effects[0], Effect::Broadcast { chat_id: -1, .. }));
        assert_eq!(state.sessions.get_or_create(-1).await.host(), Some(1));
    }

    #[tokio::test]
    async fn test_chats_are_independent() {
        let state = state();
        let alice = Actor::new(1, "Alice");

        handle_event(
            InboundEvent::StartGame {
                chat_id: -1,
                actor: alice.clone(),
            },
            &state,
        )
        .await;
        let effects = handle_event(
            InboundEvent::StartGame {
                chat_id: -2,
                actor: alice,
            },
            &state,
        )
        .await;

        // The cooldown in chat -1 does not block chat -2
        assert!(matches!(effects[0], Effect::Broadcast { chat_id: -2, .. }));
        assert_eq!(state.sessions.len().await, 2);
    }

    #[tokio::test]
    async fn test_rejection_leaves_session_untouched() {
        let state = state();
        let now = Utc::now();
        handle_event_at(
            InboundEvent::RevealRequest {
                chat_id: -1,
                actor: Actor::new(1, "Alice"),
            },
            &state,
            now,
        )
        .await;
        let before = state.sessions.get_or_create(-1).await;

        let effects = handle_event_at(
            InboundEvent::NextWordRequest {
                chat_id: -1,
                actor: Actor::new(2, "Bob"),
            },
            &state,
            now,
        )
        .await;

        assert!(matches!(
            effects[0],
            Effect::Private {
                user_id: 2,
                style: AlertStyle::Alert,
                ..
            }
        ));
        assert_eq!(state.sessions.get_or_create(-1).await, before);
    }
}
