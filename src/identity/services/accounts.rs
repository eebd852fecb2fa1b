//! Service layer for authentication and account administration.
//!
//! Enforces the role-based permission rules: executors administer nothing,
//! managers administer only executor accounts, and the administrator
//! account itself can never be deleted or demoted.

use crate::audit::{AuditEntry, AuditLog, AuditLogError};
use crate::executor::{
    domain::{Executor, ExecutorDomainError},
    ports::{ExecutorRepository, ExecutorRepositoryError},
};
use crate::identity::{
    domain::{IdentityDomainError, Role, User, UserId, Username, reconcile_admin},
    ports::{UserRepository, UserRepositoryError},
};
use crate::notification::services::{NotificationDraft, Notifier, NotifyError};
use crate::notification::{domain::Severity, ports::NotificationSink};
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    username: String,
    password: String,
    name: String,
    role: Role,
    specialization: Option<String>,
}

impl CreateUserRequest {
    /// Creates a request with required account fields.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            name: name.into(),
            role,
            specialization: None,
        }
    }

    /// Sets the specialization label.
    #[must_use]
    pub fn with_specialization(mut self, specialization: impl Into<String>) -> Self {
        self.specialization = Some(specialization.into());
        self
    }
}

/// Service-level errors for identity and access operations.
#[derive(Debug, Error)]
pub enum AccessError {
    /// Username/password pair did not match any account.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The requester's role or ownership does not permit the operation.
    #[error("operation not permitted")]
    PermissionDenied,

    /// An account with the requested login already exists.
    #[error("username already taken: {0}")]
    UsernameTaken(Username),

    /// The referenced account does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The executor still has tasks assigned; remove or complete them
    /// before deleting or re-roling the account.
    #[error("executor {0} still has assigned tasks")]
    ExecutorAssigned(UserId),

    /// Identity domain validation failed.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),

    /// Executor domain validation failed.
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

    /// Notification delivery failed.
    #[error(transparent)]
    Notify(#[from] NotifyError),

    /// Audit trail write failed.
    #[error(transparent)]
    Audit(#[from] AuditLogError),
}

/// Result type for identity service operations.
pub type AccessResult<T> = Result<T, AccessError>;

/// Authentication and account administration service.
pub struct AccountService<U, E, T, S, L, C>
where
    U: UserRepository,
    E: ExecutorRepository,
    T: TaskRepository,
    S: NotificationSink,
    L: AuditLog,
    C: Clock + Send + Sync,
{
    users: Arc<U>,
    executors: Arc<E>,
    tasks: Arc<T>,
    notifier: Arc<Notifier<S, C>>,
    audit: Arc<L>,
    clock: Arc<C>,
}

impl<U, E, T, S, L, C> AccountService<U, E, T, S, L, C>
where
    U: UserRepository,
    E: ExecutorRepository,
    T: TaskRepository,
    S: NotificationSink,
    L: AuditLog,
    C: Clock + Send + Sync,
{
    /// Creates a new account service.
    #[must_use]
    pub const fn new(
        users: Arc<U>,
        executors: Arc<E>,
        tasks: Arc<T>,
        notifier: Arc<Notifier<S, C>>,
        audit: Arc<L>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            users,
            executors,
            tasks,
            notifier,
            audit,
            clock,
        }
    }

    /// Authenticates a username/password pair.
    ///
    /// The returned account has its role corrected to admin when it
    /// carries the reserved login, regardless of what a stored snapshot
    /// claimed.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::InvalidCredentials`] on any mismatch; the
    /// caller cannot distinguish a missing account from a wrong password.
    pub async fn authenticate(&self, username: &str, password: &str) -> AccessResult<User> {
        let login = Username::new(username).map_err(|_| AccessError::InvalidCredentials)?;
        let stored = self
            .users
            .find_by_username(&login)
            .await?
            .filter(|candidate| candidate.password() == password)
            .ok_or(AccessError::InvalidCredentials)?;
        let user = stored.with_admin_role_corrected();

        self.notifier
            .publish(NotificationDraft::new(
                "Signed in",
                format!("Welcome, {}!", user.name()),
                Severity::Success,
                vec![user.id()],
            ))
            .await?;
        self.audit
            .record(AuditEntry::user_action(
                &user,
                "Signed in",
                format!("{} signed in", user.name()),
                &*self.clock,
            ))
            .await?;
        Ok(user)
    }

    /// Records the end of a session in the audit trail.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Audit`] when the trail is unwritable.
    pub async fn sign_out(&self, user: &User) -> AccessResult<()> {
        self.audit
            .record(AuditEntry::user_action(
                user,
                "Signed out",
                format!("{} signed out", user.name()),
                &*self.clock,
            ))
            .await?;
        Ok(())
    }

    /// Creates an account on behalf of the requester.
    ///
    /// Managers may only create executors: whatever role the request
    /// carries is coerced. The admin role can never be granted here, so
    /// the single-administrator invariant is preserved by construction.
    /// Executor-role accounts get a matching free executor record.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::PermissionDenied`] for executor requesters
    /// or an admin-role request, [`AccessError::UsernameTaken`] for a
    /// duplicate login, and validation errors for empty fields.
    pub async fn create_user(
        &self,
        requester: &User,
        request: CreateUserRequest,
    ) -> AccessResult<User> {
        if requester.role() == Role::Executor {
            return Err(AccessError::PermissionDenied);
        }
        let role = if requester.role() == Role::Manager {
            Role::Executor
        } else {
            request.role
        };
        if role == Role::Admin {
            return Err(AccessError::PermissionDenied);
        }

        let username = Username::new(request.username)?;
        if self.users.find_by_username(&username).await?.is_some() {
            return Err(AccessError::UsernameTaken(username));
        }
        let specialization = request
            .specialization
            .map(crate::identity::domain::Specialization::new)
            .transpose()?;
        let user = User::new(
            username,
            request.password,
            request.name,
            role,
            specialization,
            &*self.clock,
        )?;

        self.users.store(&user).await?;
        if role == Role::Executor {
            self.executors.store(&Executor::for_user(&user)?).await?;
        }

        self.notifier
            .publish(NotificationDraft::new(
                "User added",
                format!("New user {} has been created", user.name()),
                Severity::Success,
                vec![requester.id()],
            ))
            .await?;
        self.audit
            .record(AuditEntry::user_action(
                requester,
                "User added",
                format!("Added {}: {}", role.as_str(), user.name()),
                &*self.clock,
            ))
            .await?;
        Ok(user)
    }

    /// Deletes an account on behalf of the requester.
    ///
    /// The administrator, the requester itself, and (for manager
    /// requesters) other managers are all protected. An executor account
    /// is only deletable once no task references it; the matching
    /// executor record is removed with the account.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::PermissionDenied`] for protected targets,
    /// [`AccessError::ExecutorAssigned`] while tasks reference the
    /// executor, and [`AccessError::UserNotFound`] for an unknown target.
    pub async fn delete_user(&self, requester: &User, target_id: UserId) -> AccessResult<()> {
        if requester.role() == Role::Executor {
            return Err(AccessError::PermissionDenied);
        }
        if requester.id() == target_id {
            return Err(AccessError::PermissionDenied);
        }
        let target = self.find_user(target_id).await?;
        if target.role() == Role::Admin {
            return Err(AccessError::PermissionDenied);
        }
        if requester.role() == Role::Manager && target.role() == Role::Manager {
            return Err(AccessError::PermissionDenied);
        }
        if target.role() == Role::Executor {
            self.ensure_unassigned(target_id).await?;
        }

        self.users.remove(target_id).await?;
        if target.role() == Role::Executor {
            self.executors.remove(target_id).await?;
        }
        self.reconcile_admin().await?;

        self.notifier
            .publish(NotificationDraft::new(
                "User removed",
                format!("{} has been removed from the system", target.name()),
                Severity::Info,
                vec![requester.id()],
            ))
            .await?;
        self.audit
            .record(AuditEntry::user_action(
                requester,
                "User removed",
                format!("Removed user: {}", target.name()),
                &*self.clock,
            ))
            .await?;
        Ok(())
    }

    /// Changes the role of an account between manager and executor.
    ///
    /// The administrator can neither lose nor grant its role. Moving an
    /// executor to manager removes the executor record (only when no task
    /// references it); moving a manager to executor creates a fresh
    /// record with reset rating and history.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::PermissionDenied`] for protected targets or
    /// an admin-role request, and [`AccessError::ExecutorAssigned`] while
    /// tasks reference the executor.
    pub async fn change_role(
        &self,
        requester: &User,
        target_id: UserId,
        new_role: Role,
    ) -> AccessResult<()> {
        if requester.role() == Role::Executor {
            return Err(AccessError::PermissionDenied);
        }
        if new_role == Role::Admin {
            return Err(AccessError::PermissionDenied);
        }
        let mut target = self.find_user(target_id).await?;
        if target.role() == Role::Admin {
            return Err(AccessError::PermissionDenied);
        }
        if target.role() == new_role {
            return Ok(());
        }
        if target.role() == Role::Executor {
            self.ensure_unassigned(target_id).await?;
        }

        let old_role = target.role();
        target.set_role(new_role);
        self.users.update(&target).await?;
        if old_role == Role::Executor {
            self.executors.remove(target_id).await?;
        }
        if new_role == Role::Executor {
            self.executors.store(&Executor::for_user(&target)?).await?;
        }
        self.reconcile_admin().await?;

        self.notifier
            .publish(NotificationDraft::new(
                "Role changed",
                format!("{} is now a {}", target.name(), new_role.as_str()),
                Severity::Info,
                vec![requester.id()],
            ))
            .await?;
        self.audit
            .record(AuditEntry::user_action(
                requester,
                "Role changed",
                format!("{} assigned role: {}", target.name(), new_role.as_str()),
                &*self.clock,
            ))
            .await?;
        Ok(())
    }

    /// Replaces an account's password after verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::InvalidCredentials`] when the old password
    /// does not match, and validation errors for an empty or unchanged
    /// new password.
    pub async fn change_password(
        &self,
        requester: &User,
        target_id: UserId,
        old_password: &str,
        new_password: &str,
    ) -> AccessResult<()> {
        let mut target = self.find_user(target_id).await?;
        if target.password() != old_password {
            return Err(AccessError::InvalidCredentials);
        }
        target.set_password(new_password)?;
        self.users.update(&target).await?;

        self.notifier
            .publish(NotificationDraft::new(
                "Password changed",
                format!(
                    "Password for account {} has been changed",
                    target.username()
                ),
                Severity::Success,
                vec![requester.id()],
            ))
            .await?;
        self.audit
            .record(AuditEntry::user_action(
                requester,
                "Password changed",
                format!("Password for {} changed", target.username()),
                &*self.clock,
            ))
            .await?;
        Ok(())
    }

    /// Runs the single-administrator reconciliation pass over the stored
    /// account set.
    ///
    /// Returns `true` when any account was repaired.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Users`] when the account set cannot be read
    /// or written.
    pub async fn reconcile_admin(&self) -> AccessResult<bool> {
        let mut users = self.users.list_all().await?;
        let changed = reconcile_admin(&mut users, &*self.clock);
        if changed {
            self.users.replace_all(users).await?;
        }
        Ok(changed)
    }

    /// Returns all accounts in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Users`] when the account set cannot be read.
    pub async fn list_users(&self) -> AccessResult<Vec<User>> {
        Ok(self.users.list_all().await?)
    }

    async fn find_user(&self, id: UserId) -> AccessResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(AccessError::UserNotFound(id))
    }

    async fn ensure_unassigned(&self, executor_id: UserId) -> AccessResult<()> {
        if self.tasks.list_by_executor(executor_id).await?.is_empty() {
            Ok(())
        } else {
            Err(AccessError::ExecutorAssigned(executor_id))
        }
    }
}
