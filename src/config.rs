//! Gateway configuration
//!
//! Layered from built-in defaults, an optional config file and the
//! environment. `NFC_*` variables set dashboard keys (`NFC_PORT`,
//! `NFC_STORE_BACKEND`, ...), `FIREBASE_*` variables set the store keys under
//! their own names, and a bare `PORT` overrides the listening port.

pub mod credentials;

use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::error::{DashboardError, Result};
use credentials::ServiceAccountKey;

pub const CONFIG_PATH_VAR: &str = "NFC_DASHBOARD_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "nfc-dashboard.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackendKind {
    Firebase,
    Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    pub record_limit: usize,
    /// Per-request bound on calls to the managed store and its token endpoint
    pub request_timeout_secs: u64,
    pub store_backend: StoreBackendKind,
    pub sqlite_url: String,
    #[serde(default)]
    pub firebase_database_url: Option<String>,
    #[serde(default)]
    pub firebase_credentials_path: Option<PathBuf>,
    #[serde(default)]
    pub firebase_client_email: Option<String>,
    #[serde(default)]
    pub firebase_private_key: Option<String>,
    #[serde(default)]
    pub firebase_private_key_id: Option<String>,
    #[serde(default)]
    pub firebase_project_id: Option<String>,
    #[serde(default)]
    pub firebase_token_uri: Option<String>,
}

impl AppConfig {
    /// Load from the process environment
    pub fn load() -> Result<Self> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        let file = vars
            .get(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        Self::from_sources(Some(&file), vars)
    }

    /// Load from an optional config file and an explicit variable map
    pub fn from_sources(file: Option<&Path>, vars: HashMap<String, String>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 4000)?
            .set_default("cors_origin", "http://localhost:5173")?
            .set_default("record_limit", 10)?
            .set_default("request_timeout_secs", 10)?
            .set_default("store_backend", "firebase")?
            .set_default("sqlite_url", "sqlite://nfc-dashboard.db")?;

        if let Some(path) = file {
            if path.exists() {
                info!("Reading configuration file {:?}", path);
            }
            builder = builder.add_source(File::from(path).required(false));
        }

        let port_override = vars.get("PORT").cloned();

        builder = builder
            .add_source(
                Environment::with_prefix("NFC")
                    .prefix_separator("_")
                    .source(Some(vars.clone())),
            )
            .add_source(
                Environment::with_prefix("FIREBASE")
                    .prefix_separator("_")
                    .keep_prefix(true)
                    .source(Some(vars)),
            )
            .set_override_option("port", port_override)?;

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.record_limit == 0 {
            return Err(DashboardError::ConfigError(
                "record_limit must be at least 1".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(DashboardError::ConfigError(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }

        if self.store_backend == StoreBackendKind::Firebase && self.firebase_database_url.is_none() {
            return Err(DashboardError::ConfigError(
                "firebase_database_url is required for the firebase backend".to_string(),
            ));
        }

        if self.firebase_client_email.is_some() != self.firebase_private_key.is_some() {
            return Err(DashboardError::ConfigError(
                "firebase_client_email and firebase_private_key must be set together".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn bind_address(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                DashboardError::ConfigError(format!(
                    "Invalid bind address {}:{}: {}",
                    self.host, self.port, e
                ))
            })
    }

    /// Service account from a key file, or from inline settings
    pub fn service_account_key(&self) -> Result<Option<ServiceAccountKey>> {
        if let Some(path) = &self.firebase_credentials_path {
            return ServiceAccountKey::from_json_file(path).map(Some);
        }

        match (&self.firebase_client_email, &self.firebase_private_key) {
            (Some(client_email), Some(private_key)) => Ok(Some(ServiceAccountKey::from_inline(
                client_email.clone(),
                private_key,
                self.firebase_private_key_id.clone(),
                self.firebase_project_id.clone(),
                self.firebase_token_uri.clone(),
            ))),
            _ => Ok(None),
        }
    }
}
