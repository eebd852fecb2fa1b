//! Port contract for the audit trail.

use super::AuditEntry;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Number of entries the trail retains.
pub const AUDIT_CAPACITY: usize = 100;

/// Result type for audit log operations.
pub type AuditLogResult<T> = Result<T, AuditLogError>;

/// Append-only, capacity-bounded audit trail contract.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Records an entry, evicting the oldest beyond [`AUDIT_CAPACITY`].
    ///
    /// # Errors
    ///
    /// Returns [`AuditLogError`] when the trail is unwritable.
    async fn record(&self, entry: AuditEntry) -> AuditLogResult<()>;

    /// Returns retained entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AuditLogError`] when the trail is unreadable.
    async fn recent(&self) -> AuditLogResult<Vec<AuditEntry>>;

    /// Replaces the retained entries (newest first), truncating to
    /// [`AUDIT_CAPACITY`].
    ///
    /// Used by snapshot restoration.
    ///
    /// # Errors
    ///
    /// Returns [`AuditLogError`] when the trail is unwritable.
    async fn replace_all(&self, entries: Vec<AuditEntry>) -> AuditLogResult<()>;
}

/// Errors returned by audit log implementations.
#[derive(Debug, Clone, Error)]
pub enum AuditLogError {
    /// Storage-layer failure.
    #[error("audit log error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl AuditLogError {
    /// Wraps a storage error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
