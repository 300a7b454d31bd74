use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{latest_entries, EventStore};
use crate::error::Result;
use crate::events::Partition;

/// In-process store for demos and tests
#[derive(Clone, Default)]
pub struct MemoryStore {
    partitions: Arc<RwLock<HashMap<Partition, BTreeMap<String, Value>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, partition: Partition, key: impl Into<String>, value: Value) {
        let mut partitions = self.partitions.write().await;
        partitions
            .entry(partition)
            .or_default()
            .insert(key.into(), value);
    }

    pub async fn len(&self, partition: Partition) -> usize {
        let partitions = self.partitions.read().await;
        partitions.get(&partition).map_or(0, BTreeMap::len)
    }
}

impl EventStore for MemoryStore {
    async fn read_latest(&self, partition: Partition, limit: usize) -> Result<Vec<(String, Value)>> {
        let partitions = self.partitions.read().await;
        let entries: Vec<(String, Value)> = partitions
            .get(&partition)
            .map(|children| {
                children
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(latest_entries(entries, limit))
    }
}
