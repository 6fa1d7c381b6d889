//! Delivery of controller effects to the chat platform

use crate::protocol::{AlertStyle, Effect};
use crate::types::UserId;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("platform request failed: {0}")]
    Platform(String),
}

/// Sink for outbound effects
#[async_trait]
pub trait Outbox: Send + Sync {
    async fn deliver(&self, effect: &Effect) -> Result<(), DeliveryError>;
}

/// Deliver effects in order. Failures are logged and do not stop the rest.
/// Returns how many were delivered.
pub async fn deliver_all(outbox: &dyn Outbox, effects: &[Effect]) -> usize {
    let mut delivered = 0;
    for effect in effects {
        match outbox.deliver(effect).await {
            Ok(()) => delivered += 1,
            Err(e) => tracing::warn!(?effect, "Failed to deliver effect: {}", e),
        }
    }
    delivered
}

/// Pull out the first alert addressed to `user`, which answers their button
/// press. The remaining effects keep their order.
pub fn take_alert(effects: Vec<Effect>, user: UserId) -> (Option<String>, Vec<Effect>) {
    let mut alert = None;
    let mut rest = Vec::with_capacity(effects.len());

    for effect in effects {
        match effect {
            Effect::Private {
                user_id,
                text,
                style: AlertStyle::Alert,
                ..
            } if user_id == user && alert.is_none() => alert = Some(text),
            other => rest.push(other),
        }
    }

    (alert, rest)
}
