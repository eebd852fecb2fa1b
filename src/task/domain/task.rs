//! Task aggregate root and attached file metadata.

use super::{TaskDomainError, TaskId, TaskStatus};
use crate::executor::domain::TaskScores;
use crate::identity::domain::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Metadata of an attached file.
///
/// Only the descriptive fields travel with the task; file content lives
/// with an external blob service and is out of scope here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    /// Original file name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME content type as reported by the uploader.
    pub content_type: String,
    /// Last-modified timestamp, when the uploader reported one.
    pub last_modified: Option<DateTime<Utc>>,
}

/// Parameter object for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Task title; must be non-empty after trimming.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Completion deadline.
    pub deadline: DateTime<Utc>,
    /// Assigned executor identifier.
    pub executor_id: UserId,
    /// Assigned executor display name, denormalized for display.
    pub executor_name: String,
    /// Creating account identifier.
    pub creator_id: UserId,
    /// Creating account display name, denormalized for display.
    pub creator_name: String,
    /// Optional attachment supplied at creation.
    pub attachment: Option<FileMeta>,
}

/// Task aggregate root.
///
/// Unrated tasks carry `scores: None`; the score triple appears only once
/// the task has been rated, and is cleared again when a completed task is
/// reverted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    deadline: DateTime<Utc>,
    executor_id: UserId,
    executor_name: String,
    creator_id: UserId,
    creator_name: String,
    status: TaskStatus,
    created_at: NaiveDate,
    scores: Option<TaskScores>,
    attachment: Option<FileMeta>,
    report: Option<FileMeta>,
}

impl Task {
    /// Creates a new in-progress, unrated task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is empty
    /// after trimming.
    pub fn create(new: NewTask, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        if new.title.trim().is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        Ok(Self {
            id: TaskId::new(),
            title: new.title,
            description: new.description,
            deadline: new.deadline,
            executor_id: new.executor_id,
            executor_name: new.executor_name,
            creator_id: new.creator_id,
            creator_name: new.creator_name,
            status: TaskStatus::InProgress,
            created_at: clock.utc().date_naive(),
            scores: None,
            attachment: new.attachment,
            report: None,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the completion deadline.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Returns the assigned executor identifier.
    #[must_use]
    pub const fn executor_id(&self) -> UserId {
        self.executor_id
    }

    /// Returns the assigned executor display name.
    #[must_use]
    pub fn executor_name(&self) -> &str {
        &self.executor_name
    }

    /// Returns the creating account identifier.
    #[must_use]
    pub const fn creator_id(&self) -> UserId {
        self.creator_id
    }

    /// Returns the creating account display name.
    #[must_use]
    pub fn creator_name(&self) -> &str {
        &self.creator_name
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the creation date.
    #[must_use]
    pub const fn created_at(&self) -> NaiveDate {
        self.created_at
    }

    /// Returns the rating scores, present only for rated tasks.
    #[must_use]
    pub const fn scores(&self) -> Option<TaskScores> {
        self.scores
    }

    /// Returns the attachment metadata, if any.
    #[must_use]
    pub const fn attachment(&self) -> Option<&FileMeta> {
        self.attachment.as_ref()
    }

    /// Returns the submitted report metadata, if any.
    #[must_use]
    pub const fn report(&self) -> Option<&FileMeta> {
        self.report.as_ref()
    }

    /// Returns `true` when the given user is the assigned executor.
    #[must_use]
    pub fn is_assigned_to(&self, user_id: UserId) -> bool {
        self.executor_id == user_id
    }

    /// Returns `true` when the given user created the task.
    #[must_use]
    pub fn is_created_by(&self, user_id: UserId) -> bool {
        self.creator_id == user_id
    }

    /// Moves the task to another status.
    ///
    /// Any transition between distinct statuses is permitted at this level;
    /// role and ownership rules live in the lifecycle service.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when the
    /// requested status equals the current one.
    pub const fn transition_to(&mut self, new_status: TaskStatus) -> Result<(), TaskDomainError> {
        if matches!(
            (self.status, new_status),
            (TaskStatus::InProgress, TaskStatus::InProgress)
                | (TaskStatus::UnderReview, TaskStatus::UnderReview)
                | (TaskStatus::Completed, TaskStatus::Completed)
        ) {
            return Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.id,
                from: self.status,
                to: new_status,
            });
        }
        self.status = new_status;
        Ok(())
    }

    /// Submits in-progress work for review, optionally attaching a report.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when the task
    /// is not in progress.
    pub fn submit_for_review(&mut self, report: Option<FileMeta>) -> Result<(), TaskDomainError> {
        if self.status != TaskStatus::InProgress {
            return Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.id,
                from: self.status,
                to: TaskStatus::UnderReview,
            });
        }
        self.status = TaskStatus::UnderReview;
        if report.is_some() {
            self.report = report;
        }
        Ok(())
    }

    /// Records rating scores and completes the task.
    pub const fn record_scores(&mut self, scores: TaskScores) {
        self.scores = Some(scores);
        self.status = TaskStatus::Completed;
    }

    /// Clears recorded scores after a completed task is reverted.
    pub const fn clear_scores(&mut self) {
        self.scores = None;
    }
}
