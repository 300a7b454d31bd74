//! Realtime Database Store
//!
//! Reads partitions through the Realtime Database REST API, ordered by key and
//! limited to the last N children.

use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::auth::ServiceAccountAuth;
use super::{http_client, latest_entries, EventStore};
use crate::error::{DashboardError, Result};
use crate::events::Partition;

#[derive(Clone)]
pub struct FirebaseStore {
    database_url: String,
    http_client: Client,
    auth: Option<Arc<ServiceAccountAuth>>,
}

impl FirebaseStore {
    /// Store whose reads give up after `timeout`
    pub fn new(
        database_url: impl Into<String>,
        auth: Option<ServiceAccountAuth>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            database_url: database_url.into().trim_end_matches('/').to_string(),
            http_client: http_client(timeout)?,
            auth: auth.map(Arc::new),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    fn partition_url(&self, partition: Partition) -> String {
        format!("{}/{}.json", self.database_url, partition.store_key())
    }
}

impl EventStore for FirebaseStore {
    async fn read_latest(&self, partition: Partition, limit: usize) -> Result<Vec<(String, Value)>> {
        let url = self.partition_url(partition);
        debug!("Reading last {} entries of {}", limit, partition);

        let mut request = self
            .http_client
            .get(&url)
            .query(&[("orderBy", "\"$key\"".to_string()), ("limitToLast", limit.to_string())]);

        if let Some(auth) = &self.auth {
            let token = auth.access_token().await.map_err(|e| {
                DashboardError::StoreReadError(format!("Could not authenticate: {}", e))
            })?;
            request = request.query(&[("access_token", token)]);
        }

        let response = request.send().await.map_err(|e| {
            DashboardError::StoreReadError(format!("Request for {} failed: {}", partition, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DashboardError::StoreReadError(format!(
                "Realtime Database returned {} for {}: {}",
                status, partition, body
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            DashboardError::StoreReadError(format!("Malformed response for {}: {}", partition, e))
        })?;

        let entries = match body {
            Value::Null => Vec::new(),
            Value::Object(children) => children.into_iter().collect(),
            // Children keyed by small integers come back as a sparse array
            Value::Array(children) => children
                .into_iter()
                .enumerate()
                .filter(|(_, value)| !value.is_null())
                .map(|(index, value)| (index.to_string(), value))
                .collect(),
            other => {
                warn!("Unexpected {} payload: {}", partition, other);
                return Err(DashboardError::StoreReadError(format!(
                    "Partition {} is not a collection",
                    partition
                )));
            }
        };

        Ok(latest_entries(entries, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DEFAULT_REQUEST_TIMEOUT;

    #[test]
    fn test_partition_url() {
        let store =
            FirebaseStore::new("https://nfc-demo.firebaseio.com/", None, DEFAULT_REQUEST_TIMEOUT).unwrap();
        assert_eq!(
            store.partition_url(Partition::Verified),
            "https://nfc-demo.firebaseio.com/Verified.json"
        );
        assert!(!store.is_authenticated());
    }
}
