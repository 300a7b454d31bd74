//! SQLite Event Store
//!
//! Local stand-in for the managed store, one row per partition child.

use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::str::FromStr;

use super::EventStore;
use crate::error::{DashboardError, Result};
use crate::events::Partition;

// Mirrors compare_keys: non-integer keys sort above integer keys
const SELECT_LATEST: &str = r#"
    SELECT event_key, payload
    FROM events
    WHERE partition_key = ?1
    ORDER BY
        CASE WHEN event_key <> '' AND event_key NOT GLOB '*[^0-9]*' THEN 0 ELSE 1 END DESC,
        CASE WHEN event_key <> '' AND event_key NOT GLOB '*[^0-9]*' THEN CAST(event_key AS INTEGER) END DESC,
        event_key DESC
    LIMIT ?2
"#;

#[derive(Clone)]
pub struct SqlStore {
    pool: SqlitePool,
}

impl SqlStore {
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Ok(Self { pool })
    }

    /// Single-connection in-memory database; the data lives as long as the pool
    pub async fn new_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::query(include_str!("../../migrations/001_events.sql"))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert or replace the child `key` of `partition`
    pub async fn insert(&self, partition: Partition, key: &str, value: &Value) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO events (partition_key, event_key, payload)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (partition_key, event_key) DO UPDATE SET
                payload = excluded.payload,
                recorded_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(partition.store_key())
        .bind(key)
        .bind(value.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

impl EventStore for SqlStore {
    async fn read_latest(&self, partition: Partition, limit: usize) -> Result<Vec<(String, Value)>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = sqlx::query(SELECT_LATEST)
            .bind(partition.store_key())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| -> Result<(String, Value)> {
                let key: String = row.try_get("event_key")?;
                let payload: String = row.try_get("payload")?;
                let value = serde_json::from_str(&payload).map_err(|e| {
                    DashboardError::StoreReadError(format!(
                        "Corrupt payload for {}/{}: {}",
                        partition, key, e
                    ))
                })?;
                Ok((key, value))
            })
            .collect()
    }
}
