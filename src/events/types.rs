//! Event Types
//!
//! Scan events and verification outcomes as the dashboard sees them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::record::EventRecord;

/// Top-level partition of the event store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Partition {
    Log,
    Verified,
}

impl Partition {
    /// Key of the partition in the event store
    pub fn store_key(&self) -> &'static str {
        match self {
            Partition::Log => "Log",
            Partition::Verified => "Verified",
        }
    }

    /// Error message returned to HTTP clients when the partition can't be read
    pub fn read_error_message(&self) -> &'static str {
        match self {
            Partition::Log => "Error reading logs",
            Partition::Verified => "Error reading verified entries",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.store_key())
    }
}

impl std::str::FromStr for Partition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "log" | "logs" => Ok(Partition::Log),
            "verified" => Ok(Partition::Verified),
            other => Err(format!("Unknown partition: {}", other)),
        }
    }
}

/// One NFC scan event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Epoch milliseconds, unique per entry
    pub timestamp: i64,
    pub message: String,
}

impl LogEntry {
    pub fn new(timestamp: i64, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
        }
    }
}

impl From<EventRecord> for LogEntry {
    fn from(record: EventRecord) -> Self {
        let message = match record.message {
            Value::String(text) => text,
            Value::Null => String::new(),
            other => other.to_string(),
        };

        Self {
            timestamp: record.timestamp,
            message,
        }
    }
}

/// Payload of a verification entry.
///
/// The store records whatever the verifier wrote, usually a boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VerificationMessage {
    Flag(bool),
    Text(String),
    Other(Value),
}

impl VerificationMessage {
    /// Only the boolean `true` counts as an accepted verification
    pub fn is_accepted(&self) -> bool {
        matches!(self, VerificationMessage::Flag(true))
    }
}

impl From<Value> for VerificationMessage {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(flag) => VerificationMessage::Flag(flag),
            Value::String(text) => VerificationMessage::Text(text),
            other => VerificationMessage::Other(other),
        }
    }
}

impl fmt::Display for VerificationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationMessage::Flag(flag) => write!(f, "{}", flag),
            VerificationMessage::Text(text) => f.write_str(text),
            VerificationMessage::Other(Value::Null) => Ok(()),
            VerificationMessage::Other(value) => write!(f, "{}", value),
        }
    }
}

/// A verification outcome, recorded independently of the scan it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationEntry {
    /// Epoch milliseconds, unique per entry
    pub timestamp: i64,
    pub message: VerificationMessage,
}

impl VerificationEntry {
    pub fn new(timestamp: i64, message: impl Into<VerificationMessage>) -> Self {
        Self {
            timestamp,
            message: message.into(),
        }
    }
}

impl From<bool> for VerificationMessage {
    fn from(flag: bool) -> Self {
        VerificationMessage::Flag(flag)
    }
}

impl From<&str> for VerificationMessage {
    fn from(text: &str) -> Self {
        VerificationMessage::Text(text.to_string())
    }
}

impl From<EventRecord> for VerificationEntry {
    fn from(record: EventRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            message: record.message.into(),
        }
    }
}
