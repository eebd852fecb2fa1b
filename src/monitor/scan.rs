//! Deadline scanning over in-progress tasks.
//!
//! The cadence narrows as the deadline approaches: a single warning in
//! the final day, one per remaining hour inside 24 hours, one per
//! 10-minute bucket inside the last hour. Keyed notifications make every
//! band idempotent within its bucket regardless of how often a scan runs.

use crate::audit::{AuditLog, AuditLogError};
use crate::executor::ports::ExecutorRepository;
use crate::identity::domain::UserId;
use crate::notification::services::{NotificationDraft, Notifier, NotifyError};
use crate::notification::{domain::Severity, ports::NotificationSink};
use crate::task::{
    domain::{Task, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError},
    services::{TaskFlowError, TaskLifecycleService},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Urgency band of a task deadline relative to the current instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineBand {
    /// The deadline has passed.
    Overdue,
    /// Between 24 and 48 hours remain.
    OneDay,
    /// Between 1 and 23 whole hours remain.
    Hours(i64),
    /// Under an hour remains; the value is the minute count rounded up
    /// (so just under the hourly band still classifies).
    Minutes(i64),
}

impl DeadlineBand {
    /// Classifies the time remaining until `deadline`.
    ///
    /// Returns `None` when more than 48 hours remain; such tasks need no
    /// warning yet. A deadline landing exactly on `now` is not yet
    /// overdue.
    #[must_use]
    pub fn classify(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Option<Self> {
        let remaining = deadline - now;
        if remaining < chrono::Duration::zero() {
            return Some(Self::Overdue);
        }
        if remaining.num_days() == 1 {
            return Some(Self::OneDay);
        }
        let hours = remaining.num_hours();
        if (1..=23).contains(&hours) {
            return Some(Self::Hours(hours));
        }
        #[expect(
            clippy::integer_division,
            reason = "ceiling division over whole seconds; no remainder is needed"
        )]
        let minutes = (remaining.num_seconds() + 59) / 60;
        if (1..=60).contains(&minutes) {
            return Some(Self::Minutes(minutes));
        }
        None
    }
}

/// Errors surfaced by a deadline scan.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// A forced transition failed.
    #[error(transparent)]
    TaskFlow(#[from] TaskFlowError),

    /// The task set could not be read.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),

    /// Warning delivery failed.
    #[error(transparent)]
    Notify(#[from] NotifyError),

    /// Audit trail write failed.
    #[error(transparent)]
    Audit(#[from] AuditLogError),
}

/// Result type for monitor operations.
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Counts from a single scan pass, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Tasks forced into review because their deadline passed.
    pub expired: usize,
    /// Warnings actually delivered (after dedup suppression).
    pub warned: usize,
}

/// Clock-driven scanner over the in-progress task set.
pub struct DeadlineScanner<T, E, S, L, C>
where
    T: TaskRepository,
    E: ExecutorRepository,
    S: NotificationSink,
    L: AuditLog,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    lifecycle: Arc<TaskLifecycleService<T, E, S, L, C>>,
    notifier: Arc<Notifier<S, C>>,
    clock: Arc<C>,
}

impl<T, E, S, L, C> DeadlineScanner<T, E, S, L, C>
where
    T: TaskRepository,
    E: ExecutorRepository,
    S: NotificationSink,
    L: AuditLog,
    C: Clock + Send + Sync,
{
    /// Creates a scanner over the given task set.
    #[must_use]
    pub const fn new(
        tasks: Arc<T>,
        lifecycle: Arc<TaskLifecycleService<T, E, S, L, C>>,
        notifier: Arc<Notifier<S, C>>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            tasks,
            lifecycle,
            notifier,
            clock,
        }
    }

    /// Scans at the injected clock's current instant.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError`] when the task set is unreadable or a
    /// forced transition fails.
    pub async fn scan(&self) -> MonitorResult<ScanOutcome> {
        let now = self.clock.utc();
        self.scan_at(now).await
    }

    /// Scans every in-progress task against the given instant.
    ///
    /// Overdue tasks are forced into review and their executors freed;
    /// approaching deadlines emit a warning keyed to their cadence bucket.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError`] when the task set is unreadable or a
    /// forced transition fails.
    pub async fn scan_at(&self, now: DateTime<Utc>) -> MonitorResult<ScanOutcome> {
        let mut outcome = ScanOutcome::default();
        for task in self.tasks.list_by_status(TaskStatus::InProgress).await? {
            let Some(band) = DeadlineBand::classify(task.deadline(), now) else {
                continue;
            };
            if band == DeadlineBand::Overdue && self.lifecycle.expire_task(task.id()).await? {
                outcome.expired += 1;
            }
            if self.notifier.publish(warning_draft(&task, band)).await? {
                outcome.warned += 1;
            }
        }
        Ok(outcome)
    }

    /// Drops dedup entries older than the retention period.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Notify`] when the dedup window is
    /// unreadable.
    pub fn prune_window(&self) -> MonitorResult<()> {
        self.notifier.prune()?;
        Ok(())
    }
}

fn warning_draft(task: &Task, band: DeadlineBand) -> NotificationDraft {
    let recipients: Vec<UserId> = vec![task.executor_id(), task.creator_id()];
    let (key, title, message, severity) = match band {
        DeadlineBand::Overdue => (
            format!("deadline-overdue-{}", task.id()),
            "Deadline passed",
            format!("The deadline of task \"{}\" has passed", task.title()),
            Severity::Error,
        ),
        DeadlineBand::OneDay => (
            format!("deadline-1day-{}", task.id()),
            "Deadline approaching",
            format!("1 day remains until the deadline of task \"{}\"", task.title()),
            Severity::Warning,
        ),
        DeadlineBand::Hours(hours) => (
            format!("deadline-hourly-{}-{hours}", task.id()),
            "Deadline approaching",
            format!(
                "{hours} hour(s) remain until the deadline of task \"{}\"",
                task.title()
            ),
            Severity::Warning,
        ),
        DeadlineBand::Minutes(minutes) => {
            #[expect(
                clippy::integer_division,
                reason = "bucket index over whole minutes; the remainder is discarded on purpose"
            )]
            let bucket = minutes / 10;
            (
                format!("deadline-10min-{}-{bucket}", task.id()),
                "Deadline approaching",
                format!(
                    "About {minutes} minute(s) remain until the deadline of task \"{}\"",
                    task.title()
                ),
                Severity::Error,
            )
        }
    };
    NotificationDraft::new(title, message, severity, recipients).with_key(key)
}
