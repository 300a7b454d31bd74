//! Wire records
//!
//! Uniform shape both gateway endpoints respond with.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Epoch milliseconds
    pub timestamp: i64,
    /// ISO-8601 UTC rendering of `timestamp`
    pub time: String,
    pub message: Value,
}

impl EventRecord {
    /// Build a record from a raw store key and value.
    ///
    /// Returns `None` when the key is not an epoch-millisecond timestamp.
    pub fn from_raw(key: &str, value: Value) -> Option<Self> {
        let timestamp = match key.trim().parse::<i64>() {
            Ok(timestamp) => timestamp,
            Err(_) => {
                warn!("Skipping store entry with non-numeric key: {}", key);
                return None;
            }
        };

        let time = match iso_time(timestamp) {
            Some(time) => time,
            None => {
                warn!("Skipping store entry with out-of-range timestamp: {}", timestamp);
                return None;
            }
        };

        Some(Self {
            timestamp,
            time,
            message: value,
        })
    }

    /// Reshape raw store pairs into at most `limit` records, ascending by timestamp
    pub fn reshape(raw: Vec<(String, Value)>, limit: usize) -> Vec<Self> {
        let mut records: Vec<Self> = raw
            .into_iter()
            .filter_map(|(key, value)| Self::from_raw(&key, value))
            .collect();

        records.sort_by_key(|record| record.timestamp);

        if records.len() > limit {
            records.drain(..records.len() - limit);
        }

        records
    }
}

/// Millisecond-precision ISO-8601 with a `Z` suffix
pub fn iso_time(timestamp: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(timestamp)
        .map(|time| time.to_rfc3339_opts(SecondsFormat::Millis, true))
}
