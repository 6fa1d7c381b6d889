//! Telegram transport
//!
//! Long-polls updates with teloxide, turns group messages and button presses
//! into session events and delivers the resulting effects.

use super::handlers::handle_event;
use super::outbox::{deliver_all, take_alert, DeliveryError, Outbox};
use crate::protocol::{ControlAction, Controls, Effect, InboundEvent};
use crate::state::AppState;
use crate::text::Messages;
use crate::types::Actor;
use async_trait::async_trait;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode, User};
use teloxide::utils::command::BotCommands;

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Commands:")]
pub enum Command {
    #[command(description = "start a game and become the host")]
    Start,
    #[command(description = "same as /start")]
    Game,
    #[command(description = "show the rules")]
    Rules,
}

/// What a group text message means
#[derive(Debug, Clone, PartialEq)]
pub enum TextRoute {
    Rules,
    Start,
    Guess,
}

pub fn route_text(text: &str, bot_username: &str, messages: &Messages) -> TextRoute {
    match Command::parse(text, bot_username) {
        Ok(Command::Rules) => TextRoute::Rules,
        Ok(Command::Start | Command::Game) => TextRoute::Start,
        Err(_) if messages.is_start_keyword(text) => TextRoute::Start,
        Err(_) => TextRoute::Guess,
    }
}

/// Where a message was sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
    Other,
}

impl ChatKind {
    fn of(chat: &teloxide::types::Chat) -> Self {
        if chat.is_private() {
            ChatKind::Private
        } else if chat.is_group() || chat.is_supergroup() {
            ChatKind::Group
        } else {
            ChatKind::Other
        }
    }
}

/// How to respond to a text message
#[derive(Debug, Clone, PartialEq)]
pub enum MessageReply {
    /// Send the rules, in any chat
    Rules,
    /// Explain that the game is played in groups
    Invite,
    /// Feed the message into the chat's session
    Play(TextRoute),
    Ignore,
}

pub fn classify_message(
    text: &str,
    kind: ChatKind,
    bot_username: &str,
    messages: &Messages,
) -> MessageReply {
    match (route_text(text, bot_username, messages), kind) {
        (TextRoute::Rules, _) => MessageReply::Rules,
        (_, ChatKind::Private) => MessageReply::Invite,
        (route, ChatKind::Group) => MessageReply::Play(route),
        (_, ChatKind::Other) => MessageReply::Ignore,
    }
}

/// Per-bot settings injected into the handlers
#[derive(Debug, Clone)]
pub struct BotSettings {
    pub username: String,
    pub invite_url: Option<url::Url>,
}

fn actor_from(user: &User) -> Actor {
    Actor::new(user.id.0, user.full_name())
}

pub fn keyboard(controls: &Controls) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(controls.iter().map(|row| {
        row.iter()
            .map(|button| {
                InlineKeyboardButton::callback(button.label.clone(), button.action.callback_data())
            })
            .collect::<Vec<_>>()
    }))
}

fn platform_error(e: teloxide::RequestError) -> DeliveryError {
    DeliveryError::Platform(e.to_string())
}

/// Sends effects through the Bot API
pub struct TelegramOutbox {
    bot: Bot,
}

impl TelegramOutbox {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Outbox for TelegramOutbox {
    async fn deliver(&self, effect: &Effect) -> Result<(), DeliveryError> {
        match effect {
            Effect::Broadcast {
                chat_id,
                text,
                controls,
            } => {
                let mut request = self
                    .bot
                    .send_message(ChatId(*chat_id), text)
                    .parse_mode(ParseMode::Html);
                if let Some(controls) = controls {
                    request = request.reply_markup(keyboard(controls));
                }
                request.await.map_err(platform_error)?;
            }
            // Alerts end up here only when there is no button press to answer
            Effect::Private {
                user_id,
                chat_id,
                text,
                ..
            } => {
                if let Err(e) = self.bot.send_message(ChatId(*user_id as i64), text).await {
                    // Users who never opened the bot cannot be messaged directly
                    tracing::debug!(user_id, "Direct message failed, posting in chat: {}", e);
                    self.bot
                        .send_message(ChatId(*chat_id), text)
                        .await
                        .map_err(platform_error)?;
                }
            }
        }
        Ok(())
    }
}

async fn on_message(
    bot: Bot,
    msg: Message,
    state: Arc<AppState>,
    settings: Arc<BotSettings>,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let messages = state.messages();

    let kind = ChatKind::of(&msg.chat);
    let route = match classify_message(text, kind, &settings.username, messages) {
        MessageReply::Rules => {
            bot.send_message(msg.chat.id, messages.rules(state.controller.config()))
                .await?;
            return Ok(());
        }
        MessageReply::Invite => {
            let mut request = bot.send_message(
                msg.chat.id,
                messages.private_chat(settings.invite_url.is_some()),
            );
            if let Some(url) = &settings.invite_url {
                request = request.reply_markup(InlineKeyboardMarkup::new(vec![vec![
                    InlineKeyboardButton::url(messages.invite_button(), url.clone()),
                ]]));
            }
            request.await?;
            return Ok(());
        }
        MessageReply::Play(route) => route,
        MessageReply::Ignore => return Ok(()),
    };

    let Some(user) = msg.from.as_ref().filter(|u| !u.is_bot) else {
        return Ok(());
    };
    let chat_id = msg.chat.id.0;

    let event = match route {
        TextRoute::Start => InboundEvent::StartGame {
            chat_id,
            actor: actor_from(user),
        },
        TextRoute::Guess => InboundEvent::Guess {
            chat_id,
            actor: actor_from(user),
            text: text.to_string(),
        },
        // Answered by classify_message
        TextRoute::Rules => return Ok(()),
    };

    let effects = handle_event(event, &state).await;
    deliver_all(&TelegramOutbox::new(bot), &effects).await;
    Ok(())
}

async fn on_callback(bot: Bot, q: CallbackQuery, state: Arc<AppState>) -> HandlerResult {
    let action = q
        .data
        .as_deref()
        .and_then(ControlAction::from_callback_data);
    let chat_id = q.message.as_ref().map(|m| m.chat().id.0);

    let (Some(action), Some(chat_id)) = (action, chat_id) else {
        tracing::debug!(data = ?q.data, "Ignoring unknown callback");
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    let actor = actor_from(&q.from);
    let user_id = actor.id;
    let effects = handle_event(action.into_event(chat_id, actor), &state).await;
    let (alert, rest) = take_alert(effects, user_id);

    // Every press is answered exactly once so the client stops spinning
    let answer = bot.answer_callback_query(q.id.clone());
    match alert {
        Some(text) => answer.text(text).show_alert(true).await?,
        None => answer.await?,
    };

    deliver_all(&TelegramOutbox::new(bot), &rest).await;
    Ok(())
}

/// Run the long-polling loop until Ctrl-C
pub async fn run(
    bot: Bot,
    state: Arc<AppState>,
    invite_url: Option<url::Url>,
) -> Result<(), teloxide::RequestError> {
    let me = bot.get_me().await?;
    let username = me.username().to_string();
    tracing::info!(username, "Connected to Telegram");

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!("Failed to register bot commands: {}", e);
    }

    let settings = Arc::new(BotSettings {
        username,
        invite_url,
    });

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state, settings])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
