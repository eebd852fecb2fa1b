//! In-memory audit trail.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use super::{AUDIT_CAPACITY, AuditEntry, AuditLog, AuditLogError, AuditLogResult};

/// Bounded in-memory audit trail, newest entry first.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuditLog {
    state: Arc<RwLock<VecDeque<AuditEntry>>>,
}

impl InMemoryAuditLog {
    /// Creates an empty trail.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> AuditLogError {
    AuditLogError::storage(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl AuditLog for InMemoryAuditLog {
    async fn record(&self, entry: AuditEntry) -> AuditLogResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.push_front(entry);
        state.truncate(AUDIT_CAPACITY);
        Ok(())
    }

    async fn recent(&self) -> AuditLogResult<Vec<AuditEntry>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.iter().cloned().collect())
    }

    async fn replace_all(&self, entries: Vec<AuditEntry>) -> AuditLogResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        *state = entries.into_iter().take(AUDIT_CAPACITY).collect();
        Ok(())
    }
}
