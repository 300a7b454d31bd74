//! Event Store
//!
//! Read-only access to the ordered key-value partitions the gateway proxies.

pub mod auth;
pub mod firebase;
pub mod memory;
pub mod sql;

use reqwest::Client;
use serde_json::Value;
use std::cmp::Ordering;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::{AppConfig, StoreBackendKind};
use crate::error::{DashboardError, Result};
use crate::events::Partition;

pub use auth::ServiceAccountAuth;
pub use firebase::FirebaseStore;
pub use memory::MemoryStore;
pub use sql::SqlStore;

/// Upper bound on a single request to the managed store or its token endpoint
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// A readable, key-ordered event store
pub trait EventStore: Send + Sync + 'static {
    /// Up to `limit` raw entries holding the greatest keys of `partition`.
    ///
    /// An absent or empty partition yields an empty vector.
    fn read_latest(
        &self,
        partition: Partition,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<(String, Value)>>> + Send;
}

/// Store key ordering: integer keys first in numeric order, then the rest
/// lexicographically.
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    match (numeric_key(a), numeric_key(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn numeric_key(key: &str) -> Option<i64> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

/// Keep the `limit` greatest entries, greatest first
pub(crate) fn latest_entries(mut entries: Vec<(String, Value)>, limit: usize) -> Vec<(String, Value)> {
    entries.sort_by(|a, b| compare_keys(&b.0, &a.0));
    entries.truncate(limit);
    entries
}

/// HTTP client for upstream calls; a stalled upstream fails the read instead of hanging it
pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .timeout(timeout)
        .build()
        .map_err(|e| DashboardError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}

/// Store selected by configuration
#[derive(Clone)]
pub enum StoreBackend {
    Firebase(FirebaseStore),
    Sql(SqlStore),
}

impl StoreBackend {
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        match config.store_backend {
            StoreBackendKind::Firebase => {
                let database_url = config.firebase_database_url.clone().ok_or_else(|| {
                    DashboardError::ConfigError(
                        "firebase_database_url is required for the firebase backend".to_string(),
                    )
                })?;

                let timeout = config.request_timeout();
                let auth = match config.service_account_key()? {
                    Some(key) => {
                        let auth = ServiceAccountAuth::new(key, timeout)?;
                        info!("Using service account {}", auth.client_email());
                        Some(auth)
                    }
                    None => {
                        warn!("No Firebase credentials configured, reading without authentication");
                        None
                    }
                };

                Ok(StoreBackend::Firebase(FirebaseStore::new(database_url, auth, timeout)?))
            }
            StoreBackendKind::Sqlite => {
                let store = SqlStore::new(&config.sqlite_url).await?;
                store.run_migrations().await?;
                Ok(StoreBackend::Sql(store))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StoreBackend::Firebase(_) => "firebase",
            StoreBackend::Sql(_) => "sqlite",
        }
    }
}

impl EventStore for StoreBackend {
    async fn read_latest(&self, partition: Partition, limit: usize) -> Result<Vec<(String, Value)>> {
        match self {
            StoreBackend::Firebase(store) => store.read_latest(partition, limit).await,
            StoreBackend::Sql(store) => store.read_latest(partition, limit).await,
        }
    }
}
