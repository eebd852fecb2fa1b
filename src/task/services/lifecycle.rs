//! Service layer coordinating the task lifecycle.
//!
//! Every state change flows through this service so the derived executor
//! state (busy flag, history, rating) can never drift from the task set.
//! All validation happens before the first repository write; a failed
//! operation leaves no partial mutation behind.

use crate::audit::{AuditEntry, AuditLog, AuditLogError};
use crate::executor::{
    domain::{ExecutorStatus, TaskHistoryEntry, TaskScores},
    ports::{ExecutorRepository, ExecutorRepositoryError},
    services::{AvailabilityError, AvailabilityService},
};
use crate::identity::domain::{Role, User, UserId};
use crate::notification::services::{NotificationDraft, Notifier, NotifyError};
use crate::notification::{domain::Severity, ports::NotificationSink};
use crate::task::{
    domain::{FileMeta, NewTask, Task, TaskDomainError, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
    deadline: DateTime<Utc>,
    executor_id: UserId,
    attachment: Option<FileMeta>,
}

impl CreateTaskRequest {
    /// Creates a request with the required task fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        deadline: DateTime<Utc>,
        executor_id: UserId,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            deadline,
            executor_id,
            attachment: None,
        }
    }

    /// Attaches file metadata supplied at creation.
    #[must_use]
    pub fn with_attachment(mut self, attachment: FileMeta) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskFlowError {
    /// The requester's role or ownership does not permit the operation.
    #[error("operation not permitted")]
    PermissionDenied,

    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The referenced executor has no record.
    #[error("executor not found: {0}")]
    ExecutorNotFound(UserId),

    /// The executor already has an in-progress task.
    #[error("executor {0} is busy")]
    ExecutorBusy(UserId),

    /// The caller is not the executor assigned to the task.
    #[error("caller is not the assigned executor of task {0}")]
    NotAssignedExecutor(TaskId),

    /// Task domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Derived executor state could not be updated.
    #[error(transparent)]
    Availability(#[from] AvailabilityError),

    /// Task repository operation failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),

    /// Executor repository operation failed.
    #[error(transparent)]
    Executors(#[from] ExecutorRepositoryError),

    /// Notification delivery failed.
    #[error(transparent)]
    Notify(#[from] NotifyError),

    /// Audit trail write failed.
    #[error(transparent)]
    Audit(#[from] AuditLogError),
}

/// Result type for task lifecycle operations.
pub type TaskFlowResult<T> = Result<T, TaskFlowError>;

/// Orchestrates task state changes and their derived effects.
pub struct TaskLifecycleService<T, E, S, L, C>
where
    T: TaskRepository,
    E: ExecutorRepository,
    S: NotificationSink,
    L: AuditLog,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    executors: Arc<E>,
    availability: AvailabilityService<E>,
    notifier: Arc<Notifier<S, C>>,
    audit: Arc<L>,
    clock: Arc<C>,
}

impl<T, E, S, L, C> TaskLifecycleService<T, E, S, L, C>
where
    T: TaskRepository,
    E: ExecutorRepository,
    S: NotificationSink,
    L: AuditLog,
    C: Clock + Send + Sync,
{
    /// Creates a new lifecycle service.
    #[must_use]
    pub fn new(
        tasks: Arc<T>,
        executors: Arc<E>,
        notifier: Arc<Notifier<S, C>>,
        audit: Arc<L>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            tasks,
            availability: AvailabilityService::new(Arc::clone(&executors)),
            executors,
            notifier,
            audit,
            clock,
        }
    }

    /// Creates a task and assigns it to a free executor.
    ///
    /// The executor is marked busy in the same operation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskFlowError::PermissionDenied`] for executor requesters,
    /// [`TaskFlowError::ExecutorNotFound`] or [`TaskFlowError::ExecutorBusy`]
    /// for an unavailable assignee, and [`TaskDomainError::EmptyTitle`] for
    /// a blank title.
    pub async fn create_task(
        &self,
        requester: &User,
        request: CreateTaskRequest,
    ) -> TaskFlowResult<Task> {
        if requester.role() == Role::Executor {
            return Err(TaskFlowError::PermissionDenied);
        }
        let executor = self
            .executors
            .find_by_id(request.executor_id)
            .await?
            .ok_or(TaskFlowError::ExecutorNotFound(request.executor_id))?;
        if executor.status() == ExecutorStatus::Busy {
            return Err(TaskFlowError::ExecutorBusy(request.executor_id));
        }

        let task = Task::create(
            NewTask {
                title: request.title,
                description: request.description,
                deadline: request.deadline,
                executor_id: request.executor_id,
                executor_name: executor.name().to_owned(),
                creator_id: requester.id(),
                creator_name: requester.name().to_owned(),
                attachment: request.attachment,
            },
            &*self.clock,
        )?;
        self.tasks.store(&task).await?;
        self.availability.set_busy(request.executor_id).await?;

        self.notifier
            .publish(NotificationDraft::new(
                "New task assigned",
                format!(
                    "Task \"{}\" has been assigned to {}",
                    task.title(),
                    task.executor_name()
                ),
                Severity::Info,
                vec![task.executor_id(), requester.id()],
            ))
            .await?;
        self.audit
            .record(AuditEntry::user_action(
                requester,
                "Task created",
                format!("Created task \"{}\" for {}", task.title(), task.executor_name()),
                &*self.clock,
            ))
            .await?;
        Ok(task)
    }

    /// Moves a task to another status on behalf of the requester.
    ///
    /// Admins may move any task, managers only tasks they created,
    /// executors none. Leaving `Completed` with recorded scores retracts
    /// the executor's history entry and clears the scores. Entering
    /// `InProgress` marks the executor busy; any other target frees them.
    ///
    /// # Errors
    ///
    /// Returns [`TaskFlowError::PermissionDenied`] on role or ownership
    /// mismatch and [`TaskDomainError::InvalidStatusTransition`] for a
    /// self-transition.
    pub async fn change_status(
        &self,
        requester: &User,
        task_id: TaskId,
        new_status: TaskStatus,
    ) -> TaskFlowResult<Task> {
        let mut task = self.find_or_error(task_id).await?;
        self.authorize_manage(requester, &task)?;

        let old_status = task.status();
        task.transition_to(new_status)?;
        let retract = old_status == TaskStatus::Completed && task.scores().is_some();
        if retract {
            task.clear_scores();
        }

        self.tasks.update(&task).await?;
        if retract {
            self.availability
                .retract_history(task.executor_id(), task_id)
                .await?;
        }
        if new_status == TaskStatus::InProgress {
            self.availability.set_busy(task.executor_id()).await?;
        } else {
            self.availability.set_free(task.executor_id()).await?;
        }

        let (message, severity) = match new_status {
            TaskStatus::InProgress => (
                format!("Task \"{}\" is back in progress", task.title()),
                Severity::Info,
            ),
            TaskStatus::UnderReview => (
                format!("Task \"{}\" is under review", task.title()),
                Severity::Info,
            ),
            TaskStatus::Completed => (
                format!("Task \"{}\" is completed", task.title()),
                Severity::Success,
            ),
        };
        self.notifier
            .publish(NotificationDraft::new(
                "Task status changed",
                message,
                severity,
                vec![task.executor_id(), task.creator_id()],
            ))
            .await?;
        self.audit
            .record(AuditEntry::user_action(
                requester,
                "Status changed",
                format!(
                    "Task \"{}\": {} -> {}",
                    task.title(),
                    old_status.as_str(),
                    new_status.as_str()
                ),
                &*self.clock,
            ))
            .await?;
        Ok(task)
    }

    /// Submits an in-progress task for review on behalf of its executor.
    ///
    /// Frees the executor and attaches optional report metadata.
    ///
    /// # Errors
    ///
    /// Returns [`TaskFlowError::NotAssignedExecutor`] for any other caller
    /// and [`TaskDomainError::InvalidStatusTransition`] when the task is
    /// not in progress.
    pub async fn complete_with_report(
        &self,
        executor_user: &User,
        task_id: TaskId,
        report: Option<FileMeta>,
    ) -> TaskFlowResult<Task> {
        let mut task = self.find_or_error(task_id).await?;
        if !task.is_assigned_to(executor_user.id()) {
            return Err(TaskFlowError::NotAssignedExecutor(task_id));
        }

        task.submit_for_review(report)?;
        self.tasks.update(&task).await?;
        self.availability.set_free(task.executor_id()).await?;

        self.notifier
            .publish(NotificationDraft::new(
                "Task submitted for review",
                format!(
                    "{} has submitted task \"{}\" for review",
                    task.executor_name(),
                    task.title()
                ),
                Severity::Info,
                vec![task.executor_id(), task.creator_id()],
            ))
            .await?;
        self.audit
            .record(AuditEntry::user_action(
                executor_user,
                "Task submitted",
                format!("Task \"{}\" submitted for review", task.title()),
                &*self.clock,
            ))
            .await?;
        Ok(task)
    }

    /// Rates a task, completing it and folding the scores into the
    /// executor's history.
    ///
    /// Re-rating replaces the existing history entry without touching the
    /// completed-task counter; the rating is recomputed either way.
    ///
    /// # Errors
    ///
    /// Returns [`TaskFlowError::PermissionDenied`] unless the rater is an
    /// admin or the task's creator.
    pub async fn rate_task(
        &self,
        rater: &User,
        task_id: TaskId,
        scores: TaskScores,
    ) -> TaskFlowResult<Task> {
        let mut task = self.find_or_error(task_id).await?;
        if rater.role() != Role::Admin && !task.is_created_by(rater.id()) {
            return Err(TaskFlowError::PermissionDenied);
        }

        task.record_scores(scores);
        self.tasks.update(&task).await?;
        self.availability
            .upsert_history(
                task.executor_id(),
                TaskHistoryEntry {
                    task_id,
                    title: task.title().to_owned(),
                    scores,
                    date: self.clock.utc().date_naive(),
                },
            )
            .await?;
        self.availability.set_free(task.executor_id()).await?;

        self.notifier
            .publish(NotificationDraft::new(
                "Task rated",
                format!(
                    "Task \"{}\" rated {}/15",
                    task.title(),
                    scores.total()
                ),
                Severity::Success,
                vec![task.executor_id(), task.creator_id()],
            ))
            .await?;
        self.audit
            .record(AuditEntry::user_action(
                rater,
                "Task rated",
                format!("Task \"{}\" rated {}/15", task.title(), scores.total()),
                &*self.clock,
            ))
            .await?;
        Ok(task)
    }

    /// Deletes a batch of tasks, all-or-nothing.
    ///
    /// Managers may only delete tasks they created; one foreign task in
    /// the batch rejects the whole request before anything is removed.
    /// Deleting an in-progress task frees its executor.
    ///
    /// # Errors
    ///
    /// Returns [`TaskFlowError::PermissionDenied`] for executor requesters
    /// or a manager batch containing a foreign task.
    pub async fn delete_tasks(&self, requester: &User, task_ids: &[TaskId]) -> TaskFlowResult<()> {
        if requester.role() == Role::Executor {
            return Err(TaskFlowError::PermissionDenied);
        }
        // A repeated id would pass validation and then hit NotFound on
        // the second removal, after the first already mutated state.
        let mut seen = HashSet::with_capacity(task_ids.len());
        let mut selected = Vec::with_capacity(task_ids.len());
        for &task_id in task_ids {
            if !seen.insert(task_id) {
                continue;
            }
            let task = self.find_or_error(task_id).await?;
            if requester.role() == Role::Manager && !task.is_created_by(requester.id()) {
                return Err(TaskFlowError::PermissionDenied);
            }
            selected.push(task);
        }

        for task in &selected {
            self.tasks.remove(task.id()).await?;
            if task.status() == TaskStatus::InProgress {
                self.availability.set_free(task.executor_id()).await?;
            }
        }

        self.notifier
            .publish(NotificationDraft::new(
                "Tasks deleted",
                format!("{} task(s) have been deleted", selected.len()),
                Severity::Info,
                vec![requester.id()],
            ))
            .await?;
        self.audit
            .record(AuditEntry::user_action(
                requester,
                "Tasks deleted",
                format!("Deleted {} task(s)", selected.len()),
                &*self.clock,
            ))
            .await?;
        Ok(())
    }

    /// Forces an overdue in-progress task into review.
    ///
    /// Invoked by the deadline monitor. Frees the executor and writes a
    /// system audit entry. Returns `false` without touching anything when
    /// the task is no longer in progress.
    ///
    /// # Errors
    ///
    /// Returns [`TaskFlowError::TaskNotFound`] for an unknown task.
    pub async fn expire_task(&self, task_id: TaskId) -> TaskFlowResult<bool> {
        let mut task = self.find_or_error(task_id).await?;
        if task.status() != TaskStatus::InProgress {
            return Ok(false);
        }

        task.transition_to(TaskStatus::UnderReview)?;
        self.tasks.update(&task).await?;
        self.availability.set_free(task.executor_id()).await?;

        self.audit
            .record(AuditEntry::system_action(
                "Deadline passed",
                format!("Task \"{}\" moved to review after its deadline", task.title()),
                &*self.clock,
            ))
            .await?;
        Ok(true)
    }

    /// Looks up a task by id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskFlowError::TaskNotFound`] for an unknown task.
    pub async fn find_task(&self, task_id: TaskId) -> TaskFlowResult<Task> {
        self.find_or_error(task_id).await
    }

    /// Returns all tasks in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskFlowError::Tasks`] when the task set cannot be read.
    pub async fn list_tasks(&self) -> TaskFlowResult<Vec<Task>> {
        Ok(self.tasks.list_all().await?)
    }

    fn authorize_manage(&self, requester: &User, task: &Task) -> TaskFlowResult<()> {
        match requester.role() {
            Role::Admin => Ok(()),
            Role::Manager if task.is_created_by(requester.id()) => Ok(()),
            Role::Manager | Role::Executor => Err(TaskFlowError::PermissionDenied),
        }
    }

    async fn find_or_error(&self, task_id: TaskId) -> TaskFlowResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskFlowError::TaskNotFound(task_id))
    }
}
