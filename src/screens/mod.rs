//! Screens: the navigable views of the application.
//!
//! A screen is opaque to the dispatch loop beyond three capabilities: it can
//! turn buffered input into an [`Intent`], it can render itself into a
//! [`Frame`], and it can react to becoming the sole screen after a
//! clear-and-set. Visual layout beyond plain frame lines is out of scope
//! here; the window collaborator owns presentation.

mod contact_editor;
mod conversation;
mod home;
mod settings;
mod sign_in;

pub use contact_editor::ContactEditorScreen;
pub use conversation::ConversationScreen;
pub use home::HomeScreen;
pub use settings::SettingsScreen;
pub use sign_in::SignInScreen;

use crate::app::types::Connectivity;
use crate::events::KeyPress;
use crate::intent::Intent;

/// Key presses buffered between frames and drained once per frame by the
/// active screen.
#[derive(Debug, Default)]
pub struct InputState {
    keys: Vec<KeyPress>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: KeyPress) {
        self.keys.push(key);
    }

    pub fn drain(&mut self) -> Vec<KeyPress> {
        std::mem::take(&mut self.keys)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Per-frame context handed to the active screen.
pub struct ScreenCtx<'a> {
    pub input: &'a mut InputState,
    pub connectivity: Connectivity,
}

/// A rendered frame: plain text lines, one per row.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Frame {
    pub lines: Vec<String>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

/// Dimensions reported back from a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub lines: usize,
}

/// One navigable view and its input behavior.
pub trait Screen: Send {
    /// Stable name for logging and tests.
    fn name(&self) -> &'static str;

    /// Interpret this frame's buffered input; at most one intent per frame.
    fn produce_intent(&mut self, ctx: &mut ScreenCtx<'_>) -> Option<Intent>;

    /// Render into `frame`.
    fn render(&mut self, frame: &mut Frame) -> Geometry;

    /// Invoked when the screen is installed by a clear-and-set.
    fn on_activate(&mut self) {}

    /// The peer whose conversation this screen shows, if any.
    ///
    /// Drives the message-received suppression rule and focus-cancel of
    /// pending notifications.
    fn conversation_peer(&self) -> Option<&str> {
        None
    }
}
