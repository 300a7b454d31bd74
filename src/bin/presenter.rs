use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::io::Write;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nfc_dashboard::presenter::{
    render_dashboard, DashboardState, GatewayClient, PollScope, Poller, PollerConfig,
};

#[derive(Parser, Debug)]
#[command(name = "nfc-presenter", version, about = "Poll the NFC gateway and show scan verification status")]
struct Cli {
    /// Base URL of the gateway
    #[arg(long, default_value = "http://localhost:4000")]
    gateway_url: String,

    /// Seconds between polls
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    interval_secs: u64,

    /// Re-fetch verified entries on every poll, not just at startup
    #[arg(long)]
    poll_verified: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,

    /// Fetch once, print, and exit
    #[arg(long)]
    once: bool,

    /// Append each refresh instead of redrawing the screen
    #[arg(long)]
    no_clear: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so the dashboard owns stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nfc_dashboard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let client = GatewayClient::with_timeout(&cli.gateway_url, Duration::from_secs(cli.timeout_secs))?;
    let config = PollerConfig {
        interval: Duration::from_secs(cli.interval_secs),
        scope: if cli.poll_verified {
            PollScope::Both
        } else {
            PollScope::LogsOnly
        },
    };

    let (mut poller, mut updates) = Poller::new(client, config);

    if cli.once {
        poller.initial_load().await;
        draw(poller.state(), true)?;
        return Ok(());
    }

    draw(&updates.borrow_and_update(), cli.no_clear)?;
    let handle = poller.spawn();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down");
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                draw(&state, cli.no_clear)?;
            }
        }
    }

    handle.stop().await;
    Ok(())
}

fn draw(state: &DashboardState, no_clear: bool) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    if !no_clear {
        // Clear screen, cursor home
        write!(stdout, "\x1b[2J\x1b[H")?;
    }
    write!(stdout, "{}", render_dashboard(state, &Local))?;
    stdout.flush()?;
    Ok(())
}
