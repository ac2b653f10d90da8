//! # filterbot-cli
//!
//! Command-line entry for the search-filter bot: argument parsing and config loading.

pub mod cli;

pub use cli::{load_config, Cli, Commands};
pub use filterbot_telegram::AppConfig;
