pub mod handlers;
pub mod outbox;
pub mod telegram;

pub use handlers::{handle_event, handle_event_at};
pub use outbox::{deliver_all, DeliveryError, Outbox};
