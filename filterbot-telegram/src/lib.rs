//! # filterbot-telegram
//!
//! Telegram layer of the search-filter wizard: converts teloxide updates into
//! [`filterbot_core::InboundEvent`]s, implements [`filterbot_core::Bot`] on top of teloxide,
//! loads the env config, assembles components and runs the dispatcher.
//! Holds no wizard logic; everything user-facing is decided by the `wizard` crate.

mod adapters;
mod bot_adapter;
mod components;
mod config;
mod runner;

pub use adapters::{callback_to_event, classify_text, message_to_event, TelegramUserWrapper};
pub use bot_adapter::{to_markup, TelegramBotAdapter};
pub use components::{build_components, WizardComponents};
pub use config::AppConfig;
pub use runner::run_bot;
