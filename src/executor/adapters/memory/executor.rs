//! In-memory executor record repository.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::executor::{
    domain::Executor,
    ports::{ExecutorRepository, ExecutorRepositoryError, ExecutorRepositoryResult},
};
use crate::identity::domain::UserId;

/// Thread-safe in-memory executor repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryExecutorRepository {
    state: Arc<RwLock<Vec<Executor>>>,
}

impl InMemoryExecutorRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> ExecutorRepositoryError {
    ExecutorRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ExecutorRepository for InMemoryExecutorRepository {
    async fn store(&self, executor: &Executor) -> ExecutorRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.iter().any(|existing| existing.id() == executor.id()) {
            return Err(ExecutorRepositoryError::DuplicateExecutor(executor.id()));
        }
        state.push(executor.clone());
        Ok(())
    }

    async fn update(&self, executor: &Executor) -> ExecutorRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let slot = state
            .iter_mut()
            .find(|existing| existing.id() == executor.id())
            .ok_or(ExecutorRepositoryError::NotFound(executor.id()))?;
        *slot = executor.clone();
        Ok(())
    }

    async fn remove(&self, id: UserId) -> ExecutorRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let before = state.len();
        state.retain(|existing| existing.id() != id);
        if state.len() == before {
            return Err(ExecutorRepositoryError::NotFound(id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> ExecutorRepositoryResult<Option<Executor>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.iter().find(|existing| existing.id() == id).cloned())
    }

    async fn list_all(&self) -> ExecutorRepositoryResult<Vec<Executor>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.clone())
    }

    async fn replace_all(&self, executors: Vec<Executor>) -> ExecutorRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        *state = executors;
        Ok(())
    }
}
