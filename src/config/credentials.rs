use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{DashboardError, Result};

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Fields of a Google service-account key used to read the Realtime Database
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Parse a downloaded service-account JSON key file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            DashboardError::ConfigError(format!("Failed to read {:?}: {}", path, e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            DashboardError::ConfigError(format!("Failed to parse {:?}: {}", path, e))
        })
    }

    /// Build from individual settings. Escaped `\n` sequences in the private
    /// key are expanded, since environment variables usually carry it on one line.
    pub fn from_inline(
        client_email: String,
        private_key: &str,
        private_key_id: Option<String>,
        project_id: Option<String>,
        token_uri: Option<String>,
    ) -> Self {
        Self {
            client_email,
            private_key: private_key.replace("\\n", "\n"),
            private_key_id,
            project_id,
            token_uri: token_uri.unwrap_or_else(default_token_uri),
        }
    }
}
