//! Mock [`filterbot_core::Bot`] that records every send and edit.
//!
//! Sent messages get increasing ids starting at the configured first id. Each render is kept in
//! an internal log and forwarded on a channel so tests can await it.

use async_trait::async_trait;
use filterbot_core::{Bot, Chat, Keyboard, Result};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// One recorded render. `edited` is `Some(id)` for edits and `None` for sends.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub chat_id: i64,
    pub edited: Option<i32>,
    pub message_id: i32,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Rendered {
    pub fn payloads(&self) -> Vec<String> {
        self.keyboard
            .as_ref()
            .map(|k| k.buttons().map(|b| b.payload.clone()).collect())
            .unwrap_or_default()
    }
}

pub struct MockBot {
    next_id: AtomicI32,
    log: Mutex<Vec<Rendered>>,
    tx: mpsc::UnboundedSender<Rendered>,
}

impl MockBot {
    pub fn with_receiver(first_id: i32) -> (Arc<Self>, mpsc::UnboundedReceiver<Rendered>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let bot = Arc::new(Self {
            next_id: AtomicI32::new(first_id),
            log: Mutex::new(Vec::new()),
            tx,
        });
        (bot, rx)
    }

    pub fn renders(&self) -> Vec<Rendered> {
        self.log.lock().unwrap().clone()
    }

    pub fn last(&self) -> Rendered {
        self.log
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no render recorded")
    }

    pub fn count(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    fn record(&self, rendered: Rendered) {
        self.log.lock().unwrap().push(rendered.clone());
        let _ = self.tx.send(rendered);
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str, keyboard: Option<&Keyboard>) -> Result<i32> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.record(Rendered {
            chat_id: chat.id,
            edited: None,
            message_id: id,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(id)
    }

    async fn edit_message(
        &self,
        chat: &Chat,
        message_id: i32,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()> {
        self.record(Rendered {
            chat_id: chat.id,
            edited: Some(message_id),
            message_id,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }
}
