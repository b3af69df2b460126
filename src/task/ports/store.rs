//! Storage port for durable task snapshots.
//!
//! The store is a plain key-value contract over UTF-8 text. The lifecycle
//! service owns the keys and the encoding; adapters only move text.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for snapshot store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Durable key-value storage for serialized task collections.
#[async_trait]
pub trait TaskSnapshotStore: Send + Sync {
    /// Reads the record stored under `key`.
    ///
    /// Returns `None` when nothing has been written under the key yet.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Backend`] when the backing store fails.
    async fn read(&self, key: &str) -> TaskStoreResult<Option<String>>;

    /// Replaces the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Backend`] when the backing store fails.
    async fn write(&self, key: &str, value: &str) -> TaskStoreResult<()>;
}

/// Errors returned while loading or saving task snapshots.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// The backing store failed.
    #[error("snapshot store error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),

    /// A collection could not be serialized.
    #[error("failed to encode {key}: {source}")]
    Encode {
        /// Key of the record being written.
        key: &'static str,
        /// Underlying serializer error.
        #[source]
        source: Arc<serde_json::Error>,
    },

    /// A stored record could not be parsed or failed validation.
    #[error("failed to decode {key}: {source}")]
    Decode {
        /// Key of the record being read.
        key: &'static str,
        /// Underlying parser error.
        #[source]
        source: Arc<serde_json::Error>,
    },
}

impl TaskStoreError {
    /// Wraps a backend error.
    #[must_use]
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
