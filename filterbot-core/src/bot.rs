//! Bot abstraction for sending and editing messages with optional inline keyboards.
//!
//! [`Bot`] is transport-agnostic; the Telegram layer implements it via teloxide and tests
//! substitute recording mocks.

use crate::error::Result;
use crate::types::{Chat, Keyboard, RenderInstruction};
use async_trait::async_trait;

/// Render sink. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a new message and returns its transport id.
    async fn send_message(&self, chat: &Chat, text: &str, keyboard: Option<&Keyboard>)
        -> Result<i32>;

    /// Replaces text and keyboard of an already-sent message.
    async fn edit_message(
        &self,
        chat: &Chat,
        message_id: i32,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()>;

    /// Applies a render instruction: edit when it names a message, send otherwise.
    /// Returns the id of the message that now shows the render.
    async fn render(&self, instruction: &RenderInstruction) -> Result<i32> {
        let chat = Chat {
            id: instruction.chat_id,
            chat_type: String::new(),
        };
        match instruction.message_id {
            Some(id) => {
                self.edit_message(&chat, id, &instruction.text, instruction.keyboard.as_ref())
                    .await?;
                Ok(id)
            }
            None => {
                self.send_message(&chat, &instruction.text, instruction.keyboard.as_ref())
                    .await
            }
        }
    }
}
