//! App config: Telegram connection, geocoding service, database and logging. Loaded from env.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Default geocoding request timeout in seconds.
pub const DEFAULT_GEOCODER_TIMEOUT_SECS: u64 = 10;

/// Everything the bot needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// GEOCODER_URL
    pub geocoder_url: String,
    /// GEOCODER_QUERY_PARAM, query-string parameter carrying the typed city name
    pub geocoder_query_param: String,
    /// GEOCODER_TIMEOUT_SECS
    pub geocoder_timeout_secs: u64,
    /// Filter persistence database URL (SQLite)
    pub database_url: String,
    /// Log file path
    pub log_file: String,
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{} not set", name))
}

impl AppConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => required("BOT_TOKEN")?,
        };
        let geocoder_url = required("GEOCODER_URL")?;
        let database_url = required("DATABASE_URL")?;
        let geocoder_query_param = env::var("GEOCODER_QUERY_PARAM")
            .unwrap_or_else(|_| geocoder::DEFAULT_QUERY_PARAM.to_string());
        let geocoder_timeout_secs = match env::var("GEOCODER_TIMEOUT_SECS") {
            Ok(s) => s
                .parse()
                .with_context(|| format!("GEOCODER_TIMEOUT_SECS is not a number: {}", s))?,
            Err(_) => DEFAULT_GEOCODER_TIMEOUT_SECS,
        };
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/filterbot.log".to_string());
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();

        Ok(Self {
            bot_token,
            telegram_api_url,
            geocoder_url,
            geocoder_query_param,
            geocoder_timeout_secs,
            database_url,
            log_file,
        })
    }

    pub fn geocoder_timeout(&self) -> Duration {
        Duration::from_secs(self.geocoder_timeout_secs)
    }

    /// Validate config: URLs must parse, token and timeout must be non-empty / non-zero.
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN is empty");
        }
        if reqwest::Url::parse(&self.geocoder_url).is_err() {
            anyhow::bail!("GEOCODER_URL is not a valid URL: {}", self.geocoder_url);
        }
        if self.geocoder_query_param.is_empty() {
            anyhow::bail!("GEOCODER_QUERY_PARAM is empty");
        }
        if self.geocoder_timeout_secs == 0 {
            anyhow::bail!("GEOCODER_TIMEOUT_SECS must be greater than zero");
        }
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        Ok(())
    }
}
