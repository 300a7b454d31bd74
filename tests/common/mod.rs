#![allow(dead_code)]

use nfc_dashboard::error::{DashboardError, Result};
use nfc_dashboard::events::Partition;
use nfc_dashboard::gateway::{self, GatewayState};
use nfc_dashboard::presenter::DashboardState;
use nfc_dashboard::store::{EventStore, MemoryStore};
use serde_json::Value;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Store whose every read fails
#[derive(Clone, Default)]
pub struct FailingStore;

impl EventStore for FailingStore {
    async fn read_latest(&self, partition: Partition, _limit: usize) -> Result<Vec<(String, Value)>> {
        Err(DashboardError::StoreReadError(format!(
            "permission denied reading {}",
            partition
        )))
    }
}

/// Memory store seeded with the given (timestamp, message) pairs
pub async fn seeded_store(logs: &[(i64, Value)], verified: &[(i64, Value)]) -> MemoryStore {
    let store = MemoryStore::new();
    for (timestamp, message) in logs {
        store
            .insert(Partition::Log, timestamp.to_string(), message.clone())
            .await;
    }
    for (timestamp, message) in verified {
        store
            .insert(Partition::Verified, timestamp.to_string(), message.clone())
            .await;
    }
    store
}

/// Serve the gateway on an ephemeral local port, returning its base URL
pub async fn spawn_gateway<S: EventStore>(store: S, record_limit: usize) -> String {
    let app = gateway::router(GatewayState::new(store, record_limit));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Base URL of a local port with nothing listening on it
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Wait until the published state satisfies `predicate`
pub async fn wait_for_state<F>(
    updates: &mut watch::Receiver<DashboardState>,
    predicate: F,
) -> DashboardState
where
    F: Fn(&DashboardState) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            {
                let state = updates.borrow_and_update();
                if predicate(&state) {
                    return state.clone();
                }
            }
            updates.changed().await.expect("poller ended before the state was reached");
        }
    })
    .await
    .expect("timed out waiting for dashboard state")
}

pub fn test_private_key() -> String {
    std::fs::read_to_string(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/service_account_key.pem"
    ))
    .unwrap()
}
