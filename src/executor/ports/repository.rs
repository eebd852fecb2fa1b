//! Repository port for executor record persistence and lookup.

use crate::executor::domain::Executor;
use crate::identity::domain::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for executor repository operations.
pub type ExecutorRepositoryResult<T> = Result<T, ExecutorRepositoryError>;

/// Executor record persistence contract.
#[async_trait]
pub trait ExecutorRepository: Send + Sync {
    /// Stores a new executor record.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorRepositoryError::DuplicateExecutor`] when a record
    /// with the same identifier already exists.
    async fn store(&self, executor: &Executor) -> ExecutorRepositoryResult<()>;

    /// Persists changes to an existing record (status, history, rating).
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorRepositoryError::NotFound`] when the record does
    /// not exist.
    async fn update(&self, executor: &Executor) -> ExecutorRepositoryResult<()>;

    /// Removes an executor record.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorRepositoryError::NotFound`] when the record does
    /// not exist.
    async fn remove(&self, id: UserId) -> ExecutorRepositoryResult<()>;

    /// Finds a record by identifier.
    ///
    /// Returns `None` when no record exists for the identifier.
    async fn find_by_id(&self, id: UserId) -> ExecutorRepositoryResult<Option<Executor>>;

    /// Returns all executor records in insertion order.
    async fn list_all(&self) -> ExecutorRepositoryResult<Vec<Executor>>;

    /// Replaces the whole record set, preserving the given order.
    ///
    /// Used by snapshot restoration.
    async fn replace_all(&self, executors: Vec<Executor>) -> ExecutorRepositoryResult<()>;
}

/// Errors returned by executor repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ExecutorRepositoryError {
    /// A record with the same identifier already exists.
    #[error("duplicate executor: {0}")]
    DuplicateExecutor(UserId),

    /// The record was not found.
    #[error("executor not found: {0}")]
    NotFound(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ExecutorRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
