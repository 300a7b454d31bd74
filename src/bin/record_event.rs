use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::info;

use nfc_dashboard::events::Partition;
use nfc_dashboard::store::SqlStore;

/// Append an event to the local SQLite store served by the gateway's sqlite backend
#[derive(Parser, Debug)]
#[command(name = "record-event", version)]
struct Cli {
    /// SQLite database URL
    #[arg(long, default_value = "sqlite://nfc-dashboard.db")]
    database_url: String,

    /// Target partition: log or verified
    #[arg(long)]
    partition: Partition,

    /// Message; JSON values are stored as JSON, anything else as text
    #[arg(long)]
    message: String,

    /// Epoch milliseconds, defaults to now
    #[arg(long)]
    timestamp: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let store = SqlStore::new(&cli.database_url)
        .await
        .with_context(|| format!("Failed to open {}", cli.database_url))?;
    store.run_migrations().await?;

    let timestamp = cli
        .timestamp
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
    let value = parse_message(&cli.message);

    store
        .insert(cli.partition, &timestamp.to_string(), &value)
        .await
        .context("Failed to record event")?;

    info!("Recorded {} event {} = {}", cli.partition, timestamp, value);
    println!("{}", timestamp);

    Ok(())
}

fn parse_message(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
