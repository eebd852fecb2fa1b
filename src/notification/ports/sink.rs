//! Sink port for delivering notifications.

use crate::notification::domain::Notification;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification sink operations.
pub type NotificationSinkResult<T> = Result<T, NotificationSinkError>;

/// Delivery contract for user-visible notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Delivers a notification to its recipients.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationSinkError`] when delivery fails; callers treat
    /// delivery failures as recoverable.
    async fn publish(&self, notification: Notification) -> NotificationSinkResult<()>;
}

/// Errors returned by notification sink implementations.
#[derive(Debug, Clone, Error)]
pub enum NotificationSinkError {
    /// Delivery-layer failure.
    #[error("notification delivery error: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotificationSinkError {
    /// Wraps a delivery error.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}
