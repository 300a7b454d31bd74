//! Gateway Client
//!
//! Fetches the two gateway collections over HTTP.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::{DashboardError, Result};
use crate::events::{EventRecord, LogEntry, VerificationEntry};

pub const LOGS_PATH: &str = "/api/logs";
pub const VERIFIED_PATH: &str = "/api/verified";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct GatewayClient {
    base_url: String,
    http_client: Client,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize(base_url.into()),
            http_client: Client::new(),
        }
    }

    /// Client whose requests give up after `timeout`
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::FetchError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: normalize(base_url.into()),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_logs(&self) -> Result<Vec<LogEntry>> {
        let records: Vec<EventRecord> = self.get_json(LOGS_PATH).await?;
        Ok(records.into_iter().map(LogEntry::from).collect())
    }

    pub async fn fetch_verified(&self) -> Result<Vec<VerificationEntry>> {
        let records: Vec<EventRecord> = self.get_json(VERIFIED_PATH).await?;
        Ok(records.into_iter().map(VerificationEntry::from).collect())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| DashboardError::FetchError(format!("GET {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| "no error detail".to_string());
            return Err(DashboardError::FetchError(format!(
                "GET {} returned {}: {}",
                url, status, detail
            )));
        }

        response
            .json()
            .await
            .map_err(|e| DashboardError::FetchError(format!("Malformed response from {}: {}", url, e)))
    }
}

fn normalize(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}
