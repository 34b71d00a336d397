//! Backend event translation.
//!
//! Backend events become connectivity updates and desktop notifications.
//! Every event invalidates the current frame, since the backend-owned records
//! the active screen renders may have changed underneath it.

use crate::events::{BackendEvent, Stage};

use super::types::Connectivity;
use super::App;

impl App {
    pub(crate) fn handle_backend_event(&mut self, event: BackendEvent) {
        tracing::debug!(?event, "backend event");
        match event {
            BackendEvent::ConnectionStatus { connected, error } => {
                self.flags.connectivity = if connected {
                    Connectivity::Connected
                } else {
                    Connectivity::Disconnected
                };
                let (title, body) = if connected {
                    ("Connected", "purr has connected")
                } else {
                    ("Disconnected", "purr has disconnected")
                };
                self.notifications.notify_transient(title, body);
                if let Some(err) = error {
                    self.notifications
                        .notify_transient("Error", &format!("purr error: {err}"));
                }
            }
            BackendEvent::KeyExchangeCompleted { nickname, error } => {
                let body = match error {
                    None => format!("Completed: {nickname}"),
                    Some(err) => format!("Failed: {err}"),
                };
                self.notifications.notify_transient("Key Exchange", &body);
            }
            BackendEvent::MessageNotSent { nickname } => {
                let body = format!("Failed to send message to {nickname}");
                self.notifications
                    .notify_transient("Message Not Sent", &body);
            }
            BackendEvent::MessageReceived { nickname } => {
                if self.conversation_is_visible(&nickname) {
                    self.window.request_redraw();
                    return;
                }
                let body = format!("Message Received from {nickname}");
                self.notifications
                    .notify(&nickname, "Message Received", &body);
            }
            BackendEvent::MessageSent {
                nickname,
                message_id,
            } => {
                tracing::debug!(nickname, id = message_id.0, "message sent");
            }
            BackendEvent::MessageDelivered {
                nickname,
                message_id,
            } => {
                tracing::debug!(nickname, id = message_id.0, "message delivered");
            }
        }
        self.window.request_redraw();
    }

    /// A received message is suppressed (no notification) only when the user
    /// is demonstrably looking at that conversation right now: window
    /// focused, stage running, and the conversation on top of the stack.
    fn conversation_is_visible(&self, nickname: &str) -> bool {
        if !self.flags.focused || self.flags.stage != Stage::Running {
            return false;
        }
        self.stack
            .current()
            .ok()
            .and_then(|screen| screen.conversation_peer())
            .map(|peer| peer == nickname)
            .unwrap_or(false)
    }
}
