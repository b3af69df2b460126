//! In-memory snapshot store for tests and embedding.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::ports::{TaskSnapshotStore, TaskStoreError, TaskStoreResult};

/// Thread-safe in-memory key-value snapshot store.
///
/// Clones share the same underlying records, so a test can keep a handle
/// and inspect what the service persisted.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotStore {
    records: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySnapshotStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `records`.
    #[must_use]
    pub fn with_records<K, V>(records: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map = records
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            records: Arc::new(RwLock::new(map)),
        }
    }
}

fn poisoned(err: impl std::fmt::Display) -> TaskStoreError {
    TaskStoreError::backend(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskSnapshotStore for InMemorySnapshotStore {
    async fn read(&self, key: &str) -> TaskStoreResult<Option<String>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> TaskStoreResult<()> {
        let mut records = self.records.write().map_err(poisoned)?;
        records.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
