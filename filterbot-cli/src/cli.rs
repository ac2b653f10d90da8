//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};
use filterbot_telegram::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "filterbot")]
#[command(about = "Real-estate search filter bot: run, list-filters", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the Telegram bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// List the saved search filters of one Telegram user (DATABASE_URL from env).
    ListFilters {
        #[arg(short, long)]
        user_id: i64,
        #[arg(long)]
        database_url: Option<String>,
    },
}

/// Load AppConfig from environment. If `token` is provided it overrides BOT_TOKEN.
pub fn load_config(token: Option<String>) -> Result<AppConfig> {
    AppConfig::load(token)
}
