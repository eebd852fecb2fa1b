//! Audit trail entry types.

use crate::identity::domain::{Role, User};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Who performed an audited action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditActor {
    /// A signed-in account.
    User {
        /// Display name at action time.
        name: String,
        /// Role at action time.
        role: Role,
    },
    /// The system itself (deadline expiry and other automatic actions).
    System,
}

impl AuditActor {
    /// Captures the acting account's name and role.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self::User {
            name: user.name().to_owned(),
            role: user.role(),
        }
    }
}

impl fmt::Display for AuditActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User { name, .. } => write!(f, "{name}"),
            Self::System => write!(f, "System"),
        }
    }
}

/// One audited action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    id: Uuid,
    timestamp: DateTime<Utc>,
    actor: AuditActor,
    action: String,
    details: String,
}

impl AuditEntry {
    /// Creates an entry for a user-initiated action.
    #[must_use]
    pub fn user_action(
        user: &User,
        action: impl Into<String>,
        details: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self::with_actor(AuditActor::from_user(user), action, details, clock)
    }

    /// Creates an entry for an automatic system action.
    #[must_use]
    pub fn system_action(
        action: impl Into<String>,
        details: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self::with_actor(AuditActor::System, action, details, clock)
    }

    fn with_actor(
        actor: AuditActor,
        action: impl Into<String>,
        details: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: clock.utc(),
            actor,
            action: action.into(),
            details: details.into(),
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns when the action happened.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns who performed the action.
    #[must_use]
    pub const fn actor(&self) -> &AuditActor {
        &self.actor
    }

    /// Returns the short action label.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Returns the free-form detail line.
    #[must_use]
    pub fn details(&self) -> &str {
        &self.details
    }
}
