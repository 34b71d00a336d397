//! Conversation screen: compose buffer and backend-owned message history.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::events::KeyPress;
use crate::intent::Intent;
use crate::traits::backend::{Backend, PAYLOAD_RESERVE};

use super::{Frame, Geometry, Screen, ScreenCtx};

pub struct ConversationScreen {
    backend: Arc<dyn Backend>,
    nickname: String,
    compose: String,
}

impl ConversationScreen {
    pub fn new(backend: Arc<dyn Backend>, nickname: String) -> Self {
        Self {
            backend,
            nickname,
            compose: String::new(),
        }
    }

    /// Submit the compose buffer.
    ///
    /// Empty payloads produce no command. Oversized payloads are truncated to
    /// the transport maximum minus the framing reserve; splitting into
    /// multiple messages is not implemented.
    fn submit(&mut self) -> Option<Intent> {
        let text = std::mem::take(&mut self.compose);
        let mut body = text.into_bytes();
        if body.is_empty() {
            return None;
        }
        let max = self.backend.max_payload_len();
        if body.len() + PAYLOAD_RESERVE > max {
            body.truncate(max.saturating_sub(PAYLOAD_RESERVE));
        }
        let message_id = self.backend.send_message(&self.nickname, body);
        Some(Intent::MessageSent {
            nickname: self.nickname.clone(),
            message_id,
        })
    }
}

/// Short relative age for a message timestamp, refreshed by the minute tick.
fn relative_age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - timestamp).num_minutes();
    if minutes <= 0 {
        "now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m")
    } else if minutes < 24 * 60 {
        format!("{}h", minutes / 60)
    } else {
        format!("{}d", minutes / (24 * 60))
    }
}

impl Screen for ConversationScreen {
    fn name(&self) -> &'static str {
        "conversation"
    }

    fn conversation_peer(&self) -> Option<&str> {
        Some(&self.nickname)
    }

    fn produce_intent(&mut self, ctx: &mut ScreenCtx<'_>) -> Option<Intent> {
        for key in ctx.input.drain() {
            match key {
                KeyPress::Char(c) => self.compose.push(c),
                KeyPress::Backspace => {
                    self.compose.pop();
                }
                KeyPress::Enter => return self.submit(),
                _ => {}
            }
        }
        None
    }

    fn render(&mut self, frame: &mut Frame) -> Geometry {
        frame.line(format!("Conversation with {}", self.nickname));
        let now = Utc::now();
        for message in self.backend.conversation(&self.nickname) {
            let body = String::from_utf8_lossy(&message.body).into_owned();
            // delivery markers come straight from the backend record
            let status = if message.outbound {
                if message.delivered {
                    " **"
                } else if message.sent {
                    " *"
                } else {
                    " ~"
                }
            } else {
                ""
            };
            frame.line(format!(
                "{body} [{}{status}]",
                relative_age(message.timestamp, now)
            ));
        }
        frame.line(format!("> {}", self.compose));
        Geometry {
            lines: frame.lines.len(),
        }
    }
}
