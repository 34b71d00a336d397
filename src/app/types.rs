//! Controller state shared with screens.

use crate::events::Stage;

/// Connection state as last reported by the backend.
///
/// `Connecting` is set optimistically when a connect command is issued and
/// cleared by the next `ConnectionStatus` event either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Disconnected,
    Connecting,
    Connected,
}

/// The handful of flags the dispatch loop consults when translating events.
#[derive(Debug, Clone, Copy)]
pub struct AppFlags {
    pub connectivity: Connectivity,
    pub focused: bool,
    pub stage: Stage,
}

impl AppFlags {
    pub fn new() -> Self {
        Self {
            connectivity: Connectivity::Disconnected,
            focused: false,
            stage: Stage::Starting,
        }
    }

    /// Drop session-scoped state; focus and stage track the window, not the
    /// session, and survive a reset.
    pub fn reset_session(&mut self) {
        self.connectivity = Connectivity::Disconnected;
    }
}

impl Default for AppFlags {
    fn default() -> Self {
        Self::new()
    }
}
