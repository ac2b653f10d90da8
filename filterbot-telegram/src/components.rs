//! Component factory: builds WizardComponents from config. Isolates assembly logic from runner.

use anyhow::Result;
use filterbot_core::Bot as CoreBot;
use geocoder::{Geocoder, HttpGeocoder};
use std::sync::Arc;
use storage::{FilterStore, SqliteFilterStore};
use teloxide::prelude::*;
use tracing::{error, info, instrument};
use wizard::{ConversationStateMachine, InMemoryStateStore, WizardService, WizardStateStore};

use crate::bot_adapter::TelegramBotAdapter;
use crate::config::AppConfig;

/// Everything run_bot needs; produced by the component factory.
pub struct WizardComponents {
    pub teloxide_bot: Bot,
    pub service: Arc<WizardService>,
}

fn build_teloxide_bot(config: &AppConfig) -> Bot {
    let bot = Bot::new(config.bot_token.clone());
    match config.telegram_api_url.as_deref() {
        Some(url_str) => match reqwest::Url::parse(url_str) {
            Ok(url) => {
                info!(url = %url_str, "Using custom Telegram API URL");
                bot.set_api_url(url)
            }
            Err(e) => {
                error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                bot
            }
        },
        None => bot,
    }
}

/// Opens the filter database, builds the geocoding client and wires the state machine behind
/// per-user queues.
#[instrument(skip(config))]
pub async fn build_components(config: &AppConfig) -> Result<WizardComponents> {
    let filters: Arc<dyn FilterStore> = Arc::new(
        SqliteFilterStore::new(&config.database_url)
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    database_url = %config.database_url,
                    "Failed to initialize filter storage"
                );
                anyhow::anyhow!("Failed to initialize filter storage: {}", e)
            })?,
    );

    let geocoder = HttpGeocoder::new(
        config.geocoder_url.clone(),
        config.geocoder_query_param.clone(),
        config.geocoder_timeout(),
    )
    .map_err(|e| anyhow::anyhow!("Failed to build geocoding client: {}", e))?;
    info!(
        endpoint = %geocoder.endpoint(),
        timeout_secs = config.geocoder_timeout_secs,
        "Geocoding client ready"
    );

    let teloxide_bot = build_teloxide_bot(config);
    let bot: Arc<dyn CoreBot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    let geocoder: Arc<dyn Geocoder> = Arc::new(geocoder);
    let states: Arc<dyn WizardStateStore> = Arc::new(InMemoryStateStore::new());

    let machine = Arc::new(ConversationStateMachine::new(
        bot,
        geocoder,
        states,
        filters,
    ));
    let service = Arc::new(WizardService::new(machine));

    Ok(WizardComponents {
        teloxide_bot,
        service,
    })
}
