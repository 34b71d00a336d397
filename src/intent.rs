//! Intents: requested state transitions, interpreted centrally.
//!
//! Screens and translators never mutate the navigation stack or application
//! flags themselves; they return an [`Intent`] and the dispatch loop applies
//! it. A `None` intent, like an unrecognized one would be, is a no-op.

use std::fmt;

use crate::screens::Screen;
use crate::traits::backend::{MessageId, Session};

/// A requested state transition.
pub enum Intent {
    /// Invalidate the current frame; no state change.
    Redraw,
    /// Pop the active screen (no-op when only one remains).
    Back,
    /// Push a screen; it becomes active.
    Push(Box<dyn Screen>),
    /// Replace the entire stack with one screen.
    Replace(Box<dyn Screen>),
    /// Unlock succeeded: adopt the backend session and clear to home.
    SignedIn(Session),
    /// Unlock failure, sign-out, or backend restart: reset connectivity and
    /// clear to the sign-in screen.
    ResetSession,
    /// Ask the backend to go online.
    Connect,
    /// Ask the backend to go offline.
    Disconnect,
    /// A message was handed to the backend; informational only.
    MessageSent {
        nickname: String,
        message_id: MessageId,
    },
}

impl fmt::Debug for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Redraw => write!(f, "Redraw"),
            Intent::Back => write!(f, "Back"),
            Intent::Push(screen) => write!(f, "Push({})", screen.name()),
            Intent::Replace(screen) => write!(f, "Replace({})", screen.name()),
            Intent::SignedIn(_) => write!(f, "SignedIn"),
            Intent::ResetSession => write!(f, "ResetSession"),
            Intent::Connect => write!(f, "Connect"),
            Intent::Disconnect => write!(f, "Disconnect"),
            Intent::MessageSent {
                nickname,
                message_id,
            } => write!(f, "MessageSent({nickname}, {})", message_id.0),
        }
    }
}
