//! Service layer for derived executor state.
//!
//! Invoked by the task lifecycle service and the deadline monitor; never
//! called independently of a task event, so the derived invariants (busy
//! status, history-backed rating and counter) always track the task set.

use crate::executor::{
    domain::{Executor, ExecutorDomainError, ExecutorStatus, TaskHistoryEntry},
    ports::{ExecutorRepository, ExecutorRepositoryError},
};
use crate::identity::domain::UserId;
use crate::task::domain::TaskId;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for availability operations.
#[derive(Debug, Error)]
pub enum AvailabilityError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ExecutorDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ExecutorRepositoryError),
}

/// Result type for availability service operations.
pub type AvailabilityResult<T> = Result<T, AvailabilityError>;

/// Derived-state writer for executor records.
#[derive(Clone)]
pub struct AvailabilityService<E>
where
    E: ExecutorRepository,
{
    executors: Arc<E>,
}

impl<E> AvailabilityService<E>
where
    E: ExecutorRepository,
{
    /// Creates a new availability service.
    #[must_use]
    pub const fn new(executors: Arc<E>) -> Self {
        Self { executors }
    }

    /// Marks an executor busy. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`AvailabilityError::Repository`] when the record is absent
    /// or persistence fails.
    pub async fn set_busy(&self, id: UserId) -> AvailabilityResult<()> {
        self.set_status(id, ExecutorStatus::Busy).await
    }

    /// Marks an executor free. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`AvailabilityError::Repository`] when the record is absent
    /// or persistence fails.
    pub async fn set_free(&self, id: UserId) -> AvailabilityResult<()> {
        self.set_status(id, ExecutorStatus::Free).await
    }

    /// Inserts or replaces the history entry keyed by the entry's task id,
    /// recomputing the rating and counter in the same write.
    ///
    /// Returns `true` when the entry was new.
    ///
    /// # Errors
    ///
    /// Returns [`AvailabilityError::Repository`] when the record is absent
    /// or persistence fails.
    pub async fn upsert_history(
        &self,
        id: UserId,
        entry: TaskHistoryEntry,
    ) -> AvailabilityResult<bool> {
        let mut executor = self.find_or_error(id).await?;
        let inserted = executor.upsert_history(entry);
        self.executors.update(&executor).await?;
        Ok(inserted)
    }

    /// Removes the history entry for the given task, recomputing the rating
    /// and counter in the same write.
    ///
    /// Returns `true` when an entry was removed.
    ///
    /// # Errors
    ///
    /// Returns [`AvailabilityError::Repository`] when the record is absent
    /// or persistence fails.
    pub async fn retract_history(&self, id: UserId, task_id: TaskId) -> AvailabilityResult<bool> {
        let mut executor = self.find_or_error(id).await?;
        let removed = executor.retract_history(task_id);
        if removed {
            self.executors.update(&executor).await?;
        }
        Ok(removed)
    }

    async fn set_status(&self, id: UserId, status: ExecutorStatus) -> AvailabilityResult<()> {
        let mut executor = self.find_or_error(id).await?;
        if executor.status() != status {
            executor.set_status(status);
            self.executors.update(&executor).await?;
        }
        Ok(())
    }

    async fn find_or_error(&self, id: UserId) -> AvailabilityResult<Executor> {
        self.executors
            .find_by_id(id)
            .await?
            .ok_or_else(|| ExecutorRepositoryError::NotFound(id).into())
    }
}
