//! Dispatcher runner: converts teloxide updates to core events and submits them to the
//! per-user wizard queues. Button presses are acknowledged before they are queued.

use anyhow::Result;
use filterbot_core::init_tracing;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::Me;
use tracing::{debug, info, instrument, warn};
use wizard::WizardService;

use crate::adapters::{callback_to_event, message_to_event};
use crate::components::build_components;
use crate::config::AppConfig;

async fn on_message(msg: Message, me: Me, service: Arc<WizardService>) -> ResponseResult<()> {
    match message_to_event(&msg, me.username()) {
        Some(event) => {
            info!(
                user_id = event.user.as_ref().map(|u| u.id),
                chat_id = event.chat.id,
                kind = event.kind.name(),
                "Received message"
            );
            service.submit(event);
        }
        None => debug!(chat_id = msg.chat.id.0, "Ignoring non-wizard message"),
    }
    Ok(())
}

async fn on_callback(bot: Bot, q: CallbackQuery, service: Arc<WizardService>) -> ResponseResult<()> {
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        warn!(error = %e, user_id = q.from.id.0, "Failed to answer callback query");
    }
    match callback_to_event(&q) {
        Some(event) => {
            info!(
                user_id = q.from.id.0,
                chat_id = event.chat.id,
                "Received button press"
            );
            service.submit(event);
        }
        None => debug!(user_id = q.from.id.0, "Ignoring callback without data or source message"),
    }
    Ok(())
}

/// Main entry: validate config, init logging, build components, then dispatch updates until
/// Ctrl-C. Queued wizard events are drained before returning.
#[instrument(skip(config))]
pub async fn run_bot(config: AppConfig) -> Result<()> {
    config.validate()?;
    init_tracing(&config.log_file)?;

    info!(
        database_url = %config.database_url,
        geocoder_url = %config.geocoder_url,
        "Initializing bot"
    );

    let components = build_components(&config).await?;
    let service = components.service.clone();

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback));

    info!("Bot started successfully");

    Dispatcher::builder(components.teloxide_bot, handler)
        .dependencies(dptree::deps![service.clone()])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("step: dispatcher stopped, draining wizard queues");
    service.shutdown().await;
    Ok(())
}
