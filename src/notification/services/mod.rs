//! Application services for notification publication.

mod notifier;

pub use notifier::{NotificationDraft, Notifier, NotifyError, NotifyResult};
