use tracing::error;

use crate::error::Result;
use crate::events::{LogEntry, VerificationEntry};
use crate::matching::{match_logs, MatchedLog};

pub const LOGS_ERROR: &str = "Failed to load logs";
pub const VERIFIED_ERROR: &str = "Failed to load verified";

/// What the dashboard currently knows. Rebuilt from fetch results each cycle;
/// a failed fetch keeps the previous collection and records a visible error.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub logs: Vec<LogEntry>,
    pub verified: Vec<VerificationEntry>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            logs: Vec::new(),
            verified: Vec::new(),
            loading: true,
            error: None,
        }
    }

    pub fn apply_logs(&mut self, result: Result<Vec<LogEntry>>) {
        match result {
            Ok(logs) => {
                self.logs = logs;
                self.error = None;
            }
            Err(e) => {
                error!("Error fetching logs: {}", e);
                self.error = Some(LOGS_ERROR.to_string());
            }
        }
        self.loading = false;
    }

    pub fn apply_verified(&mut self, result: Result<Vec<VerificationEntry>>) {
        match result {
            Ok(verified) => {
                self.verified = verified;
                self.error = None;
            }
            Err(e) => {
                error!("Error fetching verified: {}", e);
                self.error = Some(VERIFIED_ERROR.to_string());
            }
        }
        self.loading = false;
    }

    pub fn matched(&self) -> Vec<MatchedLog<'_>> {
        match_logs(&self.logs, &self.verified)
    }
}
