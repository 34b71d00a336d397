//! Settings screen.

use crate::app::types::Connectivity;
use crate::events::KeyPress;
use crate::intent::Intent;

use super::{Frame, Geometry, Screen, ScreenCtx};

pub struct SettingsScreen {
    connectivity: Connectivity,
}

impl SettingsScreen {
    pub fn new() -> Self {
        Self {
            connectivity: Connectivity::Disconnected,
        }
    }
}

impl Default for SettingsScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for SettingsScreen {
    fn name(&self) -> &'static str {
        "settings"
    }

    fn produce_intent(&mut self, ctx: &mut ScreenCtx<'_>) -> Option<Intent> {
        self.connectivity = ctx.connectivity;
        for key in ctx.input.drain() {
            if let KeyPress::Char('x') = key {
                return Some(Intent::ResetSession);
            }
        }
        None
    }

    fn render(&mut self, frame: &mut Frame) -> Geometry {
        frame.line("Settings");
        let status = match self.connectivity {
            Connectivity::Connected => "online",
            Connectivity::Connecting => "connecting",
            Connectivity::Disconnected => "offline",
        };
        frame.line(format!("status: {status}"));
        frame.line("x - sign out");
        frame.line("esc - back");
        Geometry {
            lines: frame.lines.len(),
        }
    }
}
