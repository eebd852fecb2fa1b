//! Well-known record keys for the state store.

use std::fmt;

/// Persisted record identifier.
///
/// Each variant maps to one stable string key; adapters must never invent
/// keys outside this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    /// The full account set.
    Users,
    /// The full task set.
    Tasks,
    /// The derived executor records.
    Executors,
    /// The signed-in account, when a session is active.
    CurrentUser,
    /// The audit trail.
    ActionHistory,
    /// The notification dedup window.
    SentNotifications,
}

impl StateKey {
    /// Every persisted record, in snapshot order.
    pub const ALL: [Self; 6] = [
        Self::Users,
        Self::Tasks,
        Self::Executors,
        Self::CurrentUser,
        Self::ActionHistory,
        Self::SentNotifications,
    ];

    /// Returns the stable string key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Tasks => "tasks",
            Self::Executors => "executors",
            Self::CurrentUser => "currentUser",
            Self::ActionHistory => "actionHistory",
            Self::SentNotifications => "sentNotifications",
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
