//! Desktop notifications via the platform's own command-line tools.
//!
//! Shelling out keeps the handles `Send + Sync` without dragging a D-Bus
//! connection into the controller. On Linux the `notify-send` id is kept so
//! the notification can be closed again; macOS notifications cannot be
//! recalled once posted, so their handle is a no-op.

use std::process::Command;

use crate::traits::notify::{NotificationHandle, Notifier, NotifyError};

pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, not(target_os = "linux")))]
struct NoopHandle;

#[cfg(any(test, not(target_os = "linux")))]
impl NotificationHandle for NoopHandle {
    fn cancel(&self) {}
}

#[cfg(target_os = "linux")]
struct LinuxHandle {
    id: u32,
}

#[cfg(target_os = "linux")]
impl NotificationHandle for LinuxHandle {
    fn cancel(&self) {
        if self.id == 0 {
            return;
        }
        let result = Command::new("gdbus")
            .args([
                "call",
                "--session",
                "--dest",
                "org.freedesktop.Notifications",
                "--object-path",
                "/org/freedesktop/Notifications",
                "--method",
                "org.freedesktop.Notifications.CloseNotification",
            ])
            .arg(self.id.to_string())
            .spawn();
        if let Err(err) = result {
            tracing::debug!(%err, id = self.id, "failed to close notification");
        }
    }
}

#[cfg(target_os = "linux")]
impl Notifier for DesktopNotifier {
    fn push(&self, title: &str, body: &str) -> Result<Box<dyn NotificationHandle>, NotifyError> {
        let output = Command::new("notify-send")
            .arg("--print-id")
            .arg("--")
            .arg(title)
            .arg(body)
            .output()
            .map_err(|err| NotifyError::Delivery(err.to_string()))?;
        if !output.status.success() {
            return Err(NotifyError::Delivery(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        let id = String::from_utf8_lossy(&output.stdout)
            .trim()
            .parse()
            .unwrap_or(0);
        Ok(Box::new(LinuxHandle { id }))
    }
}

#[cfg(target_os = "macos")]
impl Notifier for DesktopNotifier {
    fn push(&self, title: &str, body: &str) -> Result<Box<dyn NotificationHandle>, NotifyError> {
        let script = format!(
            r#"display notification "{}" with title "{}""#,
            escape(body),
            escape(title)
        );
        Command::new("osascript")
            .arg("-e")
            .arg(script)
            .spawn()
            .map_err(|err| NotifyError::Delivery(err.to_string()))?;
        Ok(Box::new(NoopHandle))
    }
}

#[cfg(target_os = "macos")]
fn escape(text: &str) -> String {
    text.replace('\\', r"\\").replace('"', r#"\""#)
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
impl Notifier for DesktopNotifier {
    fn push(&self, title: &str, body: &str) -> Result<Box<dyn NotificationHandle>, NotifyError> {
        tracing::info!(title, body, "notification");
        Ok(Box::new(NoopHandle))
    }
}
