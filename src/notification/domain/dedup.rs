//! Time-windowed suppression of repeated notifications.

use super::Severity;
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;

/// Key-to-timestamp map suppressing repeat emissions.
///
/// Two suppression regimes share the map:
///
/// - unkeyed notifications are deduplicated on their
///   `(title, message, severity)` triple inside a short repeat window;
/// - keyed notifications (deadline cadence buckets) are suppressed for as
///   long as their key stays in the map.
///
/// Entries older than the retention period are pruned to bound memory;
/// pruning also bounds how often a still-matching keyed warning can
/// reappear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupWindow {
    entries: HashMap<String, DateTime<Utc>>,
}

impl DedupWindow {
    /// Creates an empty window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How long an identical unkeyed triple stays suppressed.
    #[must_use]
    pub fn repeat_window() -> TimeDelta {
        TimeDelta::seconds(5)
    }

    /// How long any entry is retained before pruning.
    #[must_use]
    pub fn retention() -> TimeDelta {
        TimeDelta::hours(1)
    }

    /// Records an unkeyed emission attempt.
    ///
    /// Returns `true` when the triple may be emitted; `false` when an
    /// identical triple was emitted inside the repeat window.
    pub fn permit_triple(
        &mut self,
        title: &str,
        message: &str,
        severity: Severity,
        now: DateTime<Utc>,
    ) -> bool {
        let key = format!("{title}-{message}-{}", severity.as_str());
        let recently_sent = self
            .entries
            .get(&key)
            .is_some_and(|sent_at| now.signed_duration_since(*sent_at) < Self::repeat_window());
        if recently_sent {
            return false;
        }
        self.entries.insert(key, now);
        true
    }

    /// Records a keyed emission attempt.
    ///
    /// Returns `true` when the key was unseen; `false` while the key
    /// remains in the map.
    pub fn permit_key(&mut self, key: &str, now: DateTime<Utc>) -> bool {
        if self.entries.contains_key(key) {
            return false;
        }
        self.entries.insert(key.to_owned(), now);
        true
    }

    /// Drops entries older than the retention period.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        self.entries
            .retain(|_, sent_at| now.signed_duration_since(*sent_at) < Self::retention());
    }

    /// Returns the number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no entries are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exports the map for snapshot persistence.
    #[must_use]
    pub fn export(&self) -> HashMap<String, DateTime<Utc>> {
        self.entries.clone()
    }

    /// Restores the map from a persisted snapshot.
    #[must_use]
    pub fn from_entries(entries: HashMap<String, DateTime<Utc>>) -> Self {
        Self { entries }
    }
}
