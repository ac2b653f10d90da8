//! filterbot CLI: run the Telegram wizard, list saved filters. Config from env and optional CLI args.

use anyhow::{Context, Result};
use clap::Parser;
use filterbot_cli::{load_config, Cli, Commands};
use filterbot_telegram::run_bot;
use storage::SqliteFilterStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = load_config(token)?;
            run_bot(config).await
        }
        Commands::ListFilters {
            user_id,
            database_url,
        } => handle_list_filters(user_id, database_url).await,
    }
}

/// Handle list-filters command.
///
/// Opens the filter database (argument, else DATABASE_URL) and prints the user's filters in
/// insertion order.
async fn handle_list_filters(user_id: i64, database_url: Option<String>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()))
        .with_target(false)
        .init();

    let database_url = match database_url {
        Some(url) => url,
        None => std::env::var("DATABASE_URL").context("DATABASE_URL not set")?,
    };
    let store = SqliteFilterStore::new(&database_url)
        .await
        .with_context(|| format!("Open filter database {}", database_url))?;

    let filters = store
        .filters_for_user(user_id)
        .await
        .context("Query saved filters")?;

    if filters.is_empty() {
        println!("No saved filters for user {}.", user_id);
        return Ok(());
    }

    let bound = |v: Option<i64>| v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
    println!("{} filter(s) for user {}:\n", filters.len(), user_id);
    println!(
        "{:<6} {:<40} {:<10} {:<8} {:<8} {:<6} {:<10} {:<10} {}",
        "id", "name", "category", "city", "region", "cur", "from", "to", "created_at"
    );
    println!("{}", "-".repeat(120));
    for f in &filters {
        println!(
            "{:<6} {:<40} {:<10} {:<8} {:<8} {:<6} {:<10} {:<10} {}",
            f.id,
            f.filter_name,
            f.category_id,
            f.city_id,
            f.region_id,
            f.currency,
            bound(f.price_from),
            bound(f.price_to),
            f.created_at.format("%Y-%m-%d %H:%M:%S")
        );
    }

    Ok(())
}
