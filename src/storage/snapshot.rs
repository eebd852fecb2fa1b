//! Snapshot mirroring between the live repositories and the state store.
//!
//! Restoration is deliberately forgiving: a missing, malformed, or
//! unreadable record degrades to the canonical seed with a logged warning
//! and never surfaces to the caller. Writes likewise log and continue, so
//! a broken store only costs durability, not the running session.

use crate::audit::{AuditEntry, AuditLog, AuditLogError};
use crate::executor::{
    domain::{Executor, ExecutorDomainError},
    ports::{ExecutorRepository, ExecutorRepositoryError},
};
use crate::identity::{
    domain::{IdentityDomainError, Role, Specialization, User, Username, reconcile_admin},
    ports::{UserRepository, UserRepositoryError},
};
use crate::notification::ports::NotificationSink;
use crate::notification::services::{Notifier, NotifyError};
use crate::storage::{StateKey, StateStore, StoreError};
use crate::task::{
    domain::Task,
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by snapshot operations.
///
/// Store and serialization failures never appear here; they degrade with
/// a warning instead.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Seed construction failed identity validation.
    #[error(transparent)]
    Identity(#[from] IdentityDomainError),

    /// Seed construction failed executor validation.
    #[error(transparent)]
    ExecutorDomain(#[from] ExecutorDomainError),

    /// Account repository operation failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),

    /// Executor repository operation failed.
    #[error(transparent)]
    Executors(#[from] ExecutorRepositoryError),

    /// Task repository operation failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),

    /// Audit trail operation failed.
    #[error(transparent)]
    Audit(#[from] AuditLogError),

    /// Dedup window export or restore failed.
    #[error(transparent)]
    Notify(#[from] NotifyError),

    /// Session state was inaccessible.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Mirrors repositories, audit trail, dedup window, and session into the
/// state store.
pub struct SnapshotService<K, U, E, T, S, L, C>
where
    K: StateStore,
    U: UserRepository,
    E: ExecutorRepository,
    T: TaskRepository,
    S: NotificationSink,
    L: AuditLog,
    C: Clock + Send + Sync,
{
    store: Arc<K>,
    users: Arc<U>,
    executors: Arc<E>,
    tasks: Arc<T>,
    notifier: Arc<Notifier<S, C>>,
    audit: Arc<L>,
    clock: Arc<C>,
    current_user: Mutex<Option<User>>,
}

impl<K, U, E, T, S, L, C> SnapshotService<K, U, E, T, S, L, C>
where
    K: StateStore,
    U: UserRepository,
    E: ExecutorRepository,
    T: TaskRepository,
    S: NotificationSink,
    L: AuditLog,
    C: Clock + Send + Sync,
{
    /// Creates a snapshot service over the given collaborators.
    #[must_use]
    pub fn new(
        store: Arc<K>,
        users: Arc<U>,
        executors: Arc<E>,
        tasks: Arc<T>,
        notifier: Arc<Notifier<S, C>>,
        audit: Arc<L>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            store,
            users,
            executors,
            tasks,
            notifier,
            audit,
            clock,
            current_user: Mutex::new(None),
        }
    }

    /// Loads every record into the live repositories, seeding defaults
    /// where a record is missing or unreadable.
    ///
    /// The single-administrator reconciliation runs over whatever account
    /// set came back, and the restored session account has its admin role
    /// corrected before use.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when a repository rejects the restored
    /// data; store-level failures degrade to the seed instead.
    pub async fn restore(&self) -> SnapshotResult<()> {
        let mut users: Vec<User> = match self.load(StateKey::Users).await {
            Some(users) => users,
            None => self.seed_accounts()?,
        };
        reconcile_admin(&mut users, &*self.clock);
        self.users.replace_all(users.clone()).await?;

        let executors: Vec<Executor> = match self.load(StateKey::Executors).await {
            Some(executors) => executors,
            None => derive_executors(&users)?,
        };
        self.executors.replace_all(executors).await?;

        let tasks: Vec<Task> = self.load(StateKey::Tasks).await.unwrap_or_default();
        self.tasks.replace_all(tasks).await?;

        let entries: Vec<AuditEntry> = self.load(StateKey::ActionHistory).await.unwrap_or_default();
        self.audit.replace_all(entries).await?;

        let window = self.load(StateKey::SentNotifications).await.unwrap_or_default();
        self.notifier.restore_window(window)?;

        let session: Option<User> = self.load(StateKey::CurrentUser).await;
        let mut current = self.current_user.lock().map_err(lock_error)?;
        *current = session.map(|user| user.with_admin_role_corrected());
        Ok(())
    }

    /// Writes every record from the live repositories into the store.
    ///
    /// The account set is reconciled before it is saved. Individual write
    /// failures log a warning and the pass continues.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the live repositories themselves
    /// cannot be read.
    pub async fn persist(&self) -> SnapshotResult<()> {
        let mut users = self.users.list_all().await?;
        if reconcile_admin(&mut users, &*self.clock) {
            self.users.replace_all(users.clone()).await?;
        }
        self.save(StateKey::Users, &users).await;

        let executors = self.executors.list_all().await?;
        self.save(StateKey::Executors, &executors).await;

        let tasks = self.tasks.list_all().await?;
        self.save(StateKey::Tasks, &tasks).await;

        let entries = self.audit.recent().await?;
        self.save(StateKey::ActionHistory, &entries).await;

        match self.notifier.export_window() {
            Ok(window) => self.save(StateKey::SentNotifications, &window).await,
            Err(err) => {
                tracing::warn!(error = %err, "dedup window export failed; record skipped");
            }
        }

        let session = self.current_user.lock().map_err(lock_error)?.clone();
        match session {
            Some(user) => self.save(StateKey::CurrentUser, &user).await,
            None => {
                if let Err(err) = self.store.remove(StateKey::CurrentUser).await {
                    tracing::warn!(
                        key = %StateKey::CurrentUser,
                        error = %err,
                        "snapshot remove failed; continuing in memory"
                    );
                }
            }
        }
        Ok(())
    }

    /// Returns the restored session account, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Store`] when session state is inaccessible.
    pub fn current_user(&self) -> SnapshotResult<Option<User>> {
        let current = self.current_user.lock().map_err(lock_error)?;
        Ok(current.clone())
    }

    /// Replaces the session account and mirrors it into the store.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Store`] when session state is inaccessible.
    pub async fn set_current_user(&self, user: Option<User>) -> SnapshotResult<()> {
        {
            let mut current = self.current_user.lock().map_err(lock_error)?;
            current.clone_from(&user);
        }
        match user {
            Some(user) => self.save(StateKey::CurrentUser, &user).await,
            None => {
                if let Err(err) = self.store.remove(StateKey::CurrentUser).await {
                    tracing::warn!(
                        key = %StateKey::CurrentUser,
                        error = %err,
                        "snapshot remove failed; continuing in memory"
                    );
                }
            }
        }
        Ok(())
    }

    /// Builds the canonical seed account set.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Identity`] when a seed field fails
    /// validation.
    fn seed_accounts(&self) -> SnapshotResult<Vec<User>> {
        let clock = &*self.clock;
        Ok(vec![
            User::seed_admin(clock),
            User::new(
                Username::new("manager")?,
                "manager123",
                "Project Manager",
                Role::Manager,
                Some(Specialization::new("Management")?),
                clock,
            )?,
            User::new(
                Username::new("executor")?,
                "executor123",
                "Task Executor",
                Role::Executor,
                Some(Specialization::new("Frontend developer")?),
                clock,
            )?,
        ])
    }

    async fn load<D: DeserializeOwned>(&self, key: StateKey) -> Option<D> {
        let raw = match self.store.read(key).await {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "snapshot read failed; using seed");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "snapshot record malformed; using seed");
                None
            }
        }
    }

    async fn save<V: Serialize + Sync>(&self, key: StateKey, value: &V) {
        match serde_json::to_string(value) {
            Ok(json) => {
                if let Err(err) = self.store.write(key, &json).await {
                    tracing::warn!(key = %key, error = %err, "snapshot write failed; continuing in memory");
                }
            }
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "snapshot serialisation failed; record skipped");
            }
        }
    }
}

/// Derives executor records for every executor-role account.
///
/// Used when the executor record is missing so the account set and the
/// derived records never disagree.
fn derive_executors(users: &[User]) -> Result<Vec<Executor>, ExecutorDomainError> {
    users
        .iter()
        .filter(|user| user.role() == Role::Executor)
        .map(Executor::for_user)
        .collect()
}

fn lock_error(err: impl std::fmt::Display) -> SnapshotError {
    SnapshotError::Store(StoreError::backend(std::io::Error::other(err.to_string())))
}
