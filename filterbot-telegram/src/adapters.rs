//! Adapters from Telegram (teloxide) updates to [`filterbot_core::InboundEvent`].
//! Depends only on teloxide and filterbot_core type definitions.

use filterbot_core::{Chat, EventKind, InboundEvent, User};
use teloxide::types::{CallbackQuery, Message};
use teloxide::utils::command::BotCommands;

/// Commands the wizard reacts to. Anything else starting with `/` is ignored.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase")]
enum Command {
    Start,
    Cancel,
}

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl TelegramUserWrapper<'_> {
    pub fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

fn core_chat(chat: &teloxide::types::Chat) -> Chat {
    let chat_type = if chat.is_private() {
        "private"
    } else if chat.is_supergroup() {
        "supergroup"
    } else if chat.is_group() {
        "group"
    } else {
        "channel"
    };
    Chat {
        id: chat.id.0,
        chat_type: chat_type.to_string(),
    }
}

/// Maps message text to an event kind. Commands addressed to another bot (`/start@other_bot`)
/// and unknown commands yield `None`; command arguments are ignored.
pub fn classify_text(text: &str, bot_username: &str) -> Option<EventKind> {
    if !text.starts_with('/') {
        return Some(EventKind::TextInput(text.to_string()));
    }
    let command = text.split_whitespace().next().unwrap_or(text);
    match Command::parse(command, bot_username) {
        Ok(Command::Start) => Some(EventKind::CommandStart),
        Ok(Command::Cancel) => Some(EventKind::CommandCancel),
        Err(_) => None,
    }
}

/// Converts a text message into an event. Non-text messages yield `None`.
pub fn message_to_event(msg: &Message, bot_username: &str) -> Option<InboundEvent> {
    let kind = classify_text(msg.text()?, bot_username)?;
    Some(InboundEvent {
        kind,
        user: msg.from.as_ref().map(|u| TelegramUserWrapper(u).to_core()),
        chat: core_chat(&msg.chat),
        message_id: Some(msg.id.0),
    })
}

/// Converts a button press into an event. Callbacks without data or without their source
/// message (e.g. inline-mode buttons) yield `None`.
pub fn callback_to_event(q: &CallbackQuery) -> Option<InboundEvent> {
    let data = q.data.clone()?;
    let source = q.message.as_ref()?;
    Some(InboundEvent {
        kind: EventKind::ButtonPress(data),
        user: Some(TelegramUserWrapper(&q.from).to_core()),
        chat: core_chat(source.chat()),
        message_id: Some(source.id().0),
    })
}
