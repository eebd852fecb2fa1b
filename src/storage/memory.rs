//! In-memory state store.

use crate::storage::{StateKey, StateStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Map-backed [`StateStore`] for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    records: RwLock<HashMap<StateKey, String>>,
}

impl InMemoryStateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn read(&self, key: StateKey) -> StoreResult<Option<String>> {
        let records = self.records.read().map_err(lock_error)?;
        Ok(records.get(&key).cloned())
    }

    async fn write(&self, key: StateKey, value: &str) -> StoreResult<()> {
        let mut records = self.records.write().map_err(lock_error)?;
        records.insert(key, value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: StateKey) -> StoreResult<()> {
        let mut records = self.records.write().map_err(lock_error)?;
        records.remove(&key);
        Ok(())
    }
}

fn lock_error(err: impl std::fmt::Display) -> StoreError {
    StoreError::backend(std::io::Error::other(err.to_string()))
}
