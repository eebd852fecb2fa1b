//! Domain model for notifications.

mod dedup;
mod notification;

pub use dedup::DedupWindow;
pub use notification::{Notification, NotificationId, Severity};
