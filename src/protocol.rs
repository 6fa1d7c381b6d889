use crate::types::*;

/// Events the dispatcher feeds into a chat's session
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    StartGame {
        chat_id: ChatId,
        actor: Actor,
    },
    RevealRequest {
        chat_id: ChatId,
        actor: Actor,
    },
    NextWordRequest {
        chat_id: ChatId,
        actor: Actor,
    },
    Guess {
        chat_id: ChatId,
        actor: Actor,
        text: String,
    },
    HideAcknowledge {
        chat_id: ChatId,
        actor: Actor,
    },
}

impl InboundEvent {
    pub fn chat_id(&self) -> ChatId {
        match self {
            InboundEvent::StartGame { chat_id, .. }
            | InboundEvent::RevealRequest { chat_id, .. }
            | InboundEvent::NextWordRequest { chat_id, .. }
            | InboundEvent::Guess { chat_id, .. }
            | InboundEvent::HideAcknowledge { chat_id, .. } => *chat_id,
        }
    }

    pub fn actor(&self) -> &Actor {
        match self {
            InboundEvent::StartGame { actor, .. }
            | InboundEvent::RevealRequest { actor, .. }
            | InboundEvent::NextWordRequest { actor, .. }
            | InboundEvent::Guess { actor, .. }
            | InboundEvent::HideAcknowledge { actor, .. } => actor,
        }
    }

    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::StartGame { .. } => "start_game",
            InboundEvent::RevealRequest { .. } => "reveal_request",
            InboundEvent::NextWordRequest { .. } => "next_word_request",
            InboundEvent::Guess { .. } => "guess",
            InboundEvent::HideAcknowledge { .. } => "hide_acknowledge",
        }
    }
}

/// Interactive buttons attached to chat messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    SeeWord,
    NextWord,
    HideWord,
}

impl ControlAction {
    pub fn callback_data(&self) -> &'static str {
        match self {
            ControlAction::SeeWord => "see_word",
            ControlAction::NextWord => "next_word",
            ControlAction::HideWord => "hide_word",
        }
    }

    pub fn from_callback_data(data: &str) -> Option<Self> {
        match data {
            "see_word" => Some(ControlAction::SeeWord),
            "next_word" => Some(ControlAction::NextWord),
            "hide_word" => Some(ControlAction::HideWord),
            _ => None,
        }
    }

    /// Turn a button press into the event it stands for
    pub fn into_event(self, chat_id: ChatId, actor: Actor) -> InboundEvent {
        match self {
            ControlAction::SeeWord => InboundEvent::RevealRequest { chat_id, actor },
            ControlAction::NextWord => InboundEvent::NextWordRequest { chat_id, actor },
            ControlAction::HideWord => InboundEvent::HideAcknowledge { chat_id, actor },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub label: String,
    pub action: ControlAction,
}

/// Rows of buttons
pub type Controls = Vec<Vec<Button>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertStyle {
    /// Popup answer to the button press that caused it
    Alert,
    /// Direct message to the participant
    Direct,
}

/// Outbound effects declared by the session controller
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Broadcast {
        chat_id: ChatId,
        text: String,
        controls: Option<Controls>,
    },
    Private {
        user_id: UserId,
        /// Chat the triggering event came from
        chat_id: ChatId,
        text: String,
        style: AlertStyle,
    },
}

impl Effect {
    pub fn text(&self) -> &str {
        match self {
            Effect::Broadcast { text, .. } | Effect::Private { text, .. } => text,
        }
    }

    pub fn is_private_to(&self, user: UserId) -> bool {
        matches!(self, Effect::Private { user_id, .. } if *user_id == user)
    }
}
