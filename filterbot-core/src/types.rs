//! Core types: user, chat, inbound events, render instructions and button layouts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User identity as delivered by the transport (id, username, names).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl User {
    /// Identity handed to the persistence layer. Display name is the username, or empty.
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            external_user_id: self.id,
            display_name: self.username.clone().unwrap_or_default(),
        }
    }
}

/// `{ externalUserId, displayName }` as stored by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub external_user_id: i64,
    pub display_name: String,
}

/// Chat (channel or private) identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub chat_type: String,
}

/// Currencies a filter can be priced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "UAH")]
    Uah,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Uah, Currency::Usd, Currency::Eur];

    /// ISO code, e.g. `"USD"`.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Uah => "UAH",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UAH" => Ok(Currency::Uah),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            other => Err(format!("unknown currency code: {}", other)),
        }
    }
}

/// What the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// `/start`
    CommandStart,
    /// `/cancel`
    CommandCancel,
    /// Inline button press carrying its callback payload.
    ButtonPress(String),
    /// Free text typed by the user.
    TextInput(String),
}

impl EventKind {
    /// Short name for logs; never includes the payload.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::CommandStart => "command_start",
            EventKind::CommandCancel => "command_cancel",
            EventKind::ButtonPress(_) => "button_press",
            EventKind::TextInput(_) => "text_input",
        }
    }
}

/// One inbound event from the transport.
///
/// `user` is `None` when the transport could not resolve a sender (e.g. channel posts);
/// such events are dropped by the wizard. `message_id` is the message that carried the event:
/// the user's own message for text/commands, the bot message holding the button for presses.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub kind: EventKind,
    pub user: Option<User>,
    pub chat: Chat,
    pub message_id: Option<i32>,
}

/// A single inline button: visible label and the payload sent back when pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub payload: String,
}

impl Button {
    pub fn new(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            payload: payload.into(),
        }
    }
}

/// Ordered buttons laid out in rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    /// Lays `buttons` out `per_row` per row, preserving order. `per_row == 0` is treated as 1.
    pub fn from_buttons(buttons: Vec<Button>, per_row: usize) -> Self {
        let per_row = per_row.max(1);
        let mut rows = Vec::new();
        let mut row = Vec::with_capacity(per_row);
        for button in buttons {
            row.push(button);
            if row.len() == per_row {
                rows.push(std::mem::replace(&mut row, Vec::with_capacity(per_row)));
            }
        }
        if !row.is_empty() {
            rows.push(row);
        }
        Self { rows }
    }

    /// Buttons in display order.
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outbound render: `message_id` present means edit that message, absent means send a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderInstruction {
    pub chat_id: i64,
    pub message_id: Option<i32>,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl RenderInstruction {
    pub fn send(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            message_id: None,
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn edit(chat_id: i64, message_id: i32, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            message_id: Some(message_id),
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}
