//! Notification record and severity levels.

use crate::identity::domain::{Role, User, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Creates a new random notification identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity of a notification, mapped to its visual treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Neutral information.
    Info,
    /// A successful operation.
    Success,
    /// Something needs attention soon.
    Warning,
    /// Something failed or is urgent.
    Error,
}

impl Severity {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    id: NotificationId,
    title: String,
    message: String,
    severity: Severity,
    recipients: Vec<UserId>,
    timestamp: DateTime<Utc>,
}

impl Notification {
    /// Creates a notification stamped at the current clock time.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        recipients: Vec<UserId>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            title: title.into(),
            message: message.into(),
            severity,
            recipients,
            timestamp: clock.utc(),
        }
    }

    /// Returns the notification identifier.
    #[must_use]
    pub const fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the short title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the message body.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the recipient set; empty means visible to everyone.
    #[must_use]
    pub fn recipients(&self) -> &[UserId] {
        &self.recipients
    }

    /// Returns the emission timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns `true` when the viewer should see this notification.
    ///
    /// Administrators see everything; an empty recipient set is visible to
    /// all; otherwise the viewer must be listed.
    #[must_use]
    pub fn visible_to(&self, viewer: &User) -> bool {
        viewer.role() == Role::Admin
            || self.recipients.is_empty()
            || self.recipients.contains(&viewer.id())
    }
}
