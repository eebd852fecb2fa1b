//! In-memory notification sink.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::identity::domain::User;
use crate::notification::{
    domain::Notification,
    ports::{NotificationSink, NotificationSinkError, NotificationSinkResult},
};

/// Sink retaining delivered notifications, newest first.
///
/// Backs the notification list a UI would poll, and doubles as the test
/// double for service-level assertions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationSink {
    state: Arc<RwLock<Vec<Notification>>>,
}

impl InMemoryNotificationSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every delivered notification, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationSinkError`] when the retained list is
    /// unreadable.
    pub fn delivered(&self) -> NotificationSinkResult<Vec<Notification>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.clone())
    }

    /// Returns the delivered notifications the viewer should see, newest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationSinkError`] when the retained list is
    /// unreadable.
    pub fn delivered_for(&self, viewer: &User) -> NotificationSinkResult<Vec<Notification>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .iter()
            .filter(|notification| notification.visible_to(viewer))
            .cloned()
            .collect())
    }
}

fn lock_error(err: impl std::fmt::Display) -> NotificationSinkError {
    NotificationSinkError::delivery(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl NotificationSink for InMemoryNotificationSink {
    async fn publish(&self, notification: Notification) -> NotificationSinkResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.insert(0, notification);
        Ok(())
    }
}
