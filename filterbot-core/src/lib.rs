//! # filterbot-core
//!
//! Core types and traits for the search-filter bot: [`Bot`] render sink, inbound events, render
//! instructions with button layouts, user identity, currencies, error types and tracing
//! initialization. Transport-agnostic; used by the wizard and the Telegram layer.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::Bot;
pub use error::{BotError, Result, WizardError};
pub use logger::{init_tracing, open_log_file, DEFAULT_LOG_FILTER};
pub use types::{
    Button, Chat, Currency, EventKind, InboundEvent, Keyboard, RenderInstruction, User,
    UserIdentity,
};
