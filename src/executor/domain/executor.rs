//! Executor aggregate: availability status and performance history.

use super::{ExecutorDomainError, ParseExecutorStatusError, Rating, TaskScores};
use crate::identity::domain::{Specialization, User, UserId};
use crate::task::domain::TaskId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Availability of an executor, derived from task assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorStatus {
    /// No in-progress task is assigned.
    Free,
    /// At least one in-progress task is assigned.
    Busy,
}

impl ExecutorStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Busy => "busy",
        }
    }
}

impl TryFrom<&str> for ExecutorStatus {
    type Error = ParseExecutorStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "free" => Ok(Self::Free),
            "busy" => Ok(Self::Busy),
            _ => Err(ParseExecutorStatusError(value.to_owned())),
        }
    }
}

/// One rated task in an executor's performance history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHistoryEntry {
    /// Identifier of the rated task; history entries are keyed by it.
    pub task_id: TaskId,
    /// Task title at rating time.
    pub title: String,
    /// The three criterion scores awarded.
    pub scores: TaskScores,
    /// Date the rating was recorded.
    pub date: NaiveDate,
}

/// Executor record: availability plus performance history.
///
/// Shares its identifier with the owning user account. The aggregate
/// rating and the completed-task counter are derived from the history and
/// kept consistent by the mutation methods here; no other component writes
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Executor {
    id: UserId,
    name: String,
    specialization: Specialization,
    rating: Rating,
    status: ExecutorStatus,
    completed_tasks: u32,
    registration_date: NaiveDate,
    task_history: Vec<TaskHistoryEntry>,
}

impl Executor {
    /// Creates a free executor with an empty history.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorDomainError::EmptyName`] when the display name is
    /// empty after trimming.
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        specialization: Specialization,
        registration_date: NaiveDate,
    ) -> Result<Self, ExecutorDomainError> {
        let display_name = name.into();
        if display_name.trim().is_empty() {
            return Err(ExecutorDomainError::EmptyName);
        }
        Ok(Self {
            id,
            name: display_name,
            specialization,
            rating: Rating::ZERO,
            status: ExecutorStatus::Free,
            completed_tasks: 0,
            registration_date,
            task_history: Vec::new(),
        })
    }

    /// Creates the executor record backing an executor-role account.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorDomainError::EmptyName`] when the account name is
    /// empty after trimming.
    pub fn for_user(user: &User) -> Result<Self, ExecutorDomainError> {
        Self::new(
            user.id(),
            user.name(),
            user.specialization()
                .cloned()
                .unwrap_or_else(Specialization::unspecified),
            user.registration_date(),
        )
    }

    /// Returns the executor identifier (shared with the user account).
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the specialization.
    #[must_use]
    pub const fn specialization(&self) -> &Specialization {
        &self.specialization
    }

    /// Returns the aggregate rating derived from the history.
    #[must_use]
    pub const fn rating(&self) -> Rating {
        self.rating
    }

    /// Returns the availability status.
    #[must_use]
    pub const fn status(&self) -> ExecutorStatus {
        self.status
    }

    /// Returns `true` when no in-progress task is assigned.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.status == ExecutorStatus::Free
    }

    /// Returns the number of rated tasks in the history.
    #[must_use]
    pub const fn completed_tasks(&self) -> u32 {
        self.completed_tasks
    }

    /// Returns the registration date.
    #[must_use]
    pub const fn registration_date(&self) -> NaiveDate {
        self.registration_date
    }

    /// Returns the performance history, oldest entry first.
    #[must_use]
    pub fn task_history(&self) -> &[TaskHistoryEntry] {
        &self.task_history
    }

    /// Sets the availability status. Idempotent.
    pub const fn set_status(&mut self, status: ExecutorStatus) {
        self.status = status;
    }

    /// Inserts or replaces the history entry for the entry's task id.
    ///
    /// The completed-task counter grows only for a first-time entry; a
    /// repeat rating replaces the stored scores without double-counting.
    /// The aggregate rating is recomputed synchronously. Returns `true`
    /// when the entry was new.
    pub fn upsert_history(&mut self, entry: TaskHistoryEntry) -> bool {
        let inserted = match self
            .task_history
            .iter_mut()
            .find(|existing| existing.task_id == entry.task_id)
        {
            Some(existing) => {
                *existing = entry;
                false
            }
            None => {
                self.task_history.push(entry);
                self.completed_tasks += 1;
                true
            }
        };
        self.recompute_rating();
        inserted
    }

    /// Removes the history entry for the given task, if present.
    ///
    /// Decrements the completed-task counter (never below zero) and
    /// recomputes the aggregate rating. Returns `true` when an entry was
    /// removed.
    pub fn retract_history(&mut self, task_id: TaskId) -> bool {
        let before = self.task_history.len();
        self.task_history.retain(|entry| entry.task_id != task_id);
        let removed = self.task_history.len() != before;
        if removed {
            self.completed_tasks = self.completed_tasks.saturating_sub(1);
            self.recompute_rating();
        }
        removed
    }

    fn recompute_rating(&mut self) {
        self.rating =
            Rating::from_totals(self.task_history.iter().map(|entry| entry.scores.total()));
    }
}
