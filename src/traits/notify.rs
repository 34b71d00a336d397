//! Desktop notification abstraction.

use thiserror::Error;

/// Errors from the notification collaborator.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// One outstanding desktop notification.
///
/// `cancel` may be called from a timer task after the handle has been moved
/// into the registry, so handles must be thread-safe. Cancelling twice is
/// harmless.
pub trait NotificationHandle: Send + Sync {
    fn cancel(&self);
}

/// Pushes desktop notifications.
pub trait Notifier: Send + Sync {
    fn push(&self, title: &str, body: &str) -> Result<Box<dyn NotificationHandle>, NotifyError>;
}
