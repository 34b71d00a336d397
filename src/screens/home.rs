//! Home screen: contact list and connectivity controls.

use std::sync::Arc;

use crate::app::types::Connectivity;
use crate::events::KeyPress;
use crate::intent::Intent;
use crate::traits::backend::Backend;

use super::{
    ContactEditorScreen, ConversationScreen, Frame, Geometry, Screen, ScreenCtx, SettingsScreen,
};

pub struct HomeScreen {
    backend: Arc<dyn Backend>,
    selected: usize,
}

impl HomeScreen {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            selected: 0,
        }
    }

    fn selected_contact(&self) -> Option<String> {
        self.backend.contacts().into_iter().nth(self.selected)
    }
}

impl Screen for HomeScreen {
    fn name(&self) -> &'static str {
        "home"
    }

    fn on_activate(&mut self) {
        self.selected = 0;
    }

    fn produce_intent(&mut self, ctx: &mut ScreenCtx<'_>) -> Option<Intent> {
        for key in ctx.input.drain() {
            match key {
                KeyPress::Up => {
                    self.selected = self.selected.saturating_sub(1);
                    return Some(Intent::Redraw);
                }
                KeyPress::Down => {
                    let count = self.backend.contacts().len();
                    if count > 0 && self.selected < count - 1 {
                        self.selected += 1;
                    }
                    return Some(Intent::Redraw);
                }
                KeyPress::Enter => {
                    let nickname = self.selected_contact()?;
                    return Some(Intent::Push(Box::new(ConversationScreen::new(
                        self.backend.clone(),
                        nickname,
                    ))));
                }
                KeyPress::Char('o') => {
                    return Some(if ctx.connectivity == Connectivity::Connected {
                        Intent::Disconnect
                    } else {
                        Intent::Connect
                    });
                }
                KeyPress::Char('s') => {
                    return Some(Intent::Push(Box::new(SettingsScreen::new())));
                }
                KeyPress::Char('a') => {
                    return Some(Intent::Push(Box::new(ContactEditorScreen::add(
                        self.backend.clone(),
                    ))));
                }
                KeyPress::Char('e') => {
                    let nickname = self.selected_contact()?;
                    return Some(Intent::Push(Box::new(ContactEditorScreen::edit(
                        self.backend.clone(),
                        nickname,
                    ))));
                }
                _ => {}
            }
        }
        None
    }

    fn render(&mut self, frame: &mut Frame) -> Geometry {
        frame.line("Contacts");
        let contacts = self.backend.contacts();
        if contacts.is_empty() {
            frame.line("(no contacts - press 'a' to add one)");
        }
        for (i, nickname) in contacts.iter().enumerate() {
            let marker = if i == self.selected { "> " } else { "  " };
            frame.line(format!("{marker}{nickname}"));
        }
        Geometry {
            lines: frame.lines.len(),
        }
    }
}
