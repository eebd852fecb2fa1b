//! Deduplicating notification publisher.

use crate::identity::domain::UserId;
use crate::notification::{
    domain::{DedupWindow, Notification, Severity},
    ports::{NotificationSink, NotificationSinkError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Service-level errors for notification publication.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Sink delivery failed.
    #[error(transparent)]
    Sink(#[from] NotificationSinkError),
}

/// Result type for notifier operations.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Draft of a notification prior to dedup and delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    key: Option<String>,
    title: String,
    message: String,
    severity: Severity,
    recipients: Vec<UserId>,
}

impl NotificationDraft {
    /// Creates an unkeyed draft, deduplicated on its content triple.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        recipients: Vec<UserId>,
    ) -> Self {
        Self {
            key: None,
            title: title.into(),
            message: message.into(),
            severity,
            recipients,
        }
    }

    /// Attaches a deterministic idempotency key (deadline cadence buckets).
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// Publisher combining the dedup window with a delivery sink.
///
/// The dedup map is shared session state: it is exported to the
/// `sentNotifications` snapshot record and restored from it on startup.
pub struct Notifier<S, C>
where
    S: NotificationSink,
    C: Clock + Send + Sync,
{
    sink: Arc<S>,
    clock: Arc<C>,
    window: Mutex<DedupWindow>,
}

impl<S, C> Notifier<S, C>
where
    S: NotificationSink,
    C: Clock + Send + Sync,
{
    /// Creates a notifier with an empty dedup window.
    #[must_use]
    pub fn new(sink: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            sink,
            clock,
            window: Mutex::new(DedupWindow::new()),
        }
    }

    /// Publishes a draft unless the dedup window suppresses it.
    ///
    /// Returns `true` when the notification was delivered.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Sink`] when delivery fails.
    pub async fn publish(&self, draft: NotificationDraft) -> NotifyResult<bool> {
        let now = self.clock.utc();
        let permitted = {
            let mut window = self.window.lock().map_err(lock_error)?;
            match draft.key.as_deref() {
                Some(key) => window.permit_key(key, now),
                None => window.permit_triple(&draft.title, &draft.message, draft.severity, now),
            }
        };
        if !permitted {
            return Ok(false);
        }

        let notification = Notification::new(
            draft.title,
            draft.message,
            draft.severity,
            draft.recipients,
            &*self.clock,
        );
        self.sink.publish(notification).await?;
        Ok(true)
    }

    /// Drops dedup entries older than the retention period.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Sink`] when the window is unreadable.
    pub fn prune(&self) -> NotifyResult<()> {
        let now = self.clock.utc();
        let mut window = self.window.lock().map_err(lock_error)?;
        window.prune(now);
        Ok(())
    }

    /// Exports the dedup map for snapshot persistence.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Sink`] when the window is unreadable.
    pub fn export_window(&self) -> NotifyResult<HashMap<String, DateTime<Utc>>> {
        let window = self.window.lock().map_err(lock_error)?;
        Ok(window.export())
    }

    /// Restores the dedup map from a persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Sink`] when the window is unwritable.
    pub fn restore_window(&self, entries: HashMap<String, DateTime<Utc>>) -> NotifyResult<()> {
        let mut window = self.window.lock().map_err(lock_error)?;
        *window = DedupWindow::from_entries(entries);
        Ok(())
    }
}

fn lock_error(err: impl std::fmt::Display) -> NotifyError {
    NotifyError::Sink(NotificationSinkError::delivery(std::io::Error::other(
        err.to_string(),
    )))
}
