//! Key/value port for persisted state records.

use crate::storage::StateKey;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for state store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// String key/value persistence contract.
///
/// Records hold pre-serialized JSON; the store never interprets the
/// payload. A missing key reads back as `None` and is never an error.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Reads a record, returning `None` when the key is absent.
    async fn read(&self, key: StateKey) -> StoreResult<Option<String>>;

    /// Writes a record, replacing any existing value.
    async fn write(&self, key: StateKey, value: &str) -> StoreResult<()>;

    /// Removes a record. Removing an absent key is a no-op.
    async fn remove(&self, key: StateKey) -> StoreResult<()>;
}

/// Errors returned by state store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("state store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure.
    #[error("state store backend error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
