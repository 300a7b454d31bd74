//! Dashboard Poller
//!
//! Fetches both collections once, then re-fetches on a fixed interval until
//! stopped. Every cycle starts from scratch; snapshots of the resulting state
//! are published on a watch channel.

use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::client::GatewayClient;
use super::state::DashboardState;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Which collections are re-fetched on each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollScope {
    /// Logs on every tick; verified entries once, and again after a failed fetch
    LogsOnly,
    Both,
}

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub interval: Duration,
    pub scope: PollScope,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            scope: PollScope::LogsOnly,
        }
    }
}

pub struct Poller {
    client: GatewayClient,
    config: PollerConfig,
    state: DashboardState,
    updates: watch::Sender<DashboardState>,
    verified_stale: bool,
}

impl Poller {
    pub fn new(client: GatewayClient, config: PollerConfig) -> (Self, watch::Receiver<DashboardState>) {
        let state = DashboardState::new();
        let (updates, receiver) = watch::channel(state.clone());

        let config = PollerConfig {
            // tokio intervals reject a zero period
            interval: config.interval.max(Duration::from_millis(1)),
            ..config
        };

        let poller = Self {
            client,
            config,
            state,
            updates,
            verified_stale: true,
        };

        (poller, receiver)
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub async fn refresh_logs(&mut self) {
        let result = self.client.fetch_logs().await;
        self.state.apply_logs(result);
        self.publish();
    }

    pub async fn refresh_verified(&mut self) {
        let result = self.client.fetch_verified().await;
        self.verified_stale = result.is_err();
        self.state.apply_verified(result);
        self.publish();
    }

    /// Fetch both collections regardless of scope
    pub async fn initial_load(&mut self) {
        self.refresh_logs().await;
        self.refresh_verified().await;
    }

    /// One scheduled cycle
    pub async fn run_cycle(&mut self) {
        debug!("Polling gateway at {}", self.client.base_url());
        self.refresh_logs().await;
        if self.config.scope == PollScope::Both || self.verified_stale {
            self.refresh_verified().await;
        }
    }

    /// Poll until `shutdown` fires or its sender is dropped
    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) {
        info!(
            "Polling {} every {:?} ({:?})",
            self.client.base_url(),
            self.config.interval,
            self.config.scope
        );

        tokio::select! {
            _ = &mut shutdown => {
                info!("Poller stopped before the initial load completed");
                return;
            }
            _ = self.initial_load() => {}
        }

        let period = self.config.interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = async {
                    ticker.tick().await;
                    self.run_cycle().await;
                } => {}
            }
        }

        info!("Poller stopped");
    }

    pub fn spawn(self) -> PollerHandle {
        let (shutdown, receiver) = oneshot::channel();
        let task = tokio::spawn(self.run(receiver));

        PollerHandle {
            shutdown: Some(shutdown),
            task,
        }
    }

    fn publish(&self) {
        self.updates.send_replace(self.state.clone());
    }
}

/// Running poller. Dropping the handle also stops the loop.
pub struct PollerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop polling and wait for the loop to exit
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        if let Err(e) = (&mut self.task).await {
            warn!("Poller task ended abnormally: {}", e);
        }
    }
}
