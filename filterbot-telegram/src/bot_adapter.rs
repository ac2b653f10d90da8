//! Wraps teloxide::Bot and implements [`filterbot_core::Bot`]. Production code renders via
//! Telegram; tests substitute another Bot impl.

use async_trait::async_trait;
use filterbot_core::{Bot as CoreBot, BotError, Chat, Keyboard, Result};
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId};
use teloxide::{ApiError, RequestError};
use tracing::debug;

/// Thin wrapper around teloxide::Bot that implements filterbot-core's Bot trait.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    /// Creates an adapter from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

/// Converts a core keyboard into Telegram inline markup, row by row.
pub fn to_markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.payload.clone()))
            .collect::<Vec<_>>()
    }))
}

/// Returns true if the error is Telegram's "message is not modified" (edit with same content).
fn is_message_not_modified(e: &RequestError) -> bool {
    matches!(e, RequestError::Api(ApiError::MessageNotModified))
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(
        &self,
        chat: &Chat,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<i32> {
        let mut request = self.bot.send_message(ChatId(chat.id), text.to_string());
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(to_markup(keyboard));
        }
        let sent = request.await.map_err(|e| BotError::Bot(e.to_string()))?;
        Ok(sent.id.0)
    }

    async fn edit_message(
        &self,
        chat: &Chat,
        message_id: i32,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()> {
        let mut request =
            self.bot
                .edit_message_text(ChatId(chat.id), MessageId(message_id), text.to_string());
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(to_markup(keyboard));
        }
        match request.await {
            Ok(_) => Ok(()),
            Err(e) if is_message_not_modified(&e) => {
                debug!(chat_id = chat.id, message_id = message_id, "Edit skipped: message not modified");
                Ok(())
            }
            Err(e) => Err(BotError::Bot(e.to_string())),
        }
    }
}
