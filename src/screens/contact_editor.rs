//! Contact editor: add a new contact or rename an existing one.

use std::sync::Arc;

use crate::events::KeyPress;
use crate::intent::Intent;
use crate::traits::backend::Backend;

use super::{Frame, Geometry, HomeScreen, Screen, ScreenCtx};

enum Mode {
    Add,
    Edit { original: String },
}

pub struct ContactEditorScreen {
    backend: Arc<dyn Backend>,
    mode: Mode,
    nickname: String,
}

impl ContactEditorScreen {
    pub fn add(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            mode: Mode::Add,
            nickname: String::new(),
        }
    }

    pub fn edit(backend: Arc<dyn Backend>, nickname: String) -> Self {
        Self {
            backend,
            mode: Mode::Edit {
                original: nickname.clone(),
            },
            nickname,
        }
    }

    fn submit(&mut self) -> Option<Intent> {
        let nickname = std::mem::take(&mut self.nickname);
        let nickname = nickname.trim();
        if nickname.is_empty() {
            return None;
        }
        match &self.mode {
            Mode::Add => {
                self.backend.add_contact(nickname);
                Some(Intent::Back)
            }
            Mode::Edit { original } => {
                if nickname != original.as_str() {
                    self.backend.rename_contact(original, nickname);
                }
                // renaming rebuilds the contact list, so land on a fresh home
                Some(Intent::Replace(Box::new(HomeScreen::new(
                    self.backend.clone(),
                ))))
            }
        }
    }
}

impl Screen for ContactEditorScreen {
    fn name(&self) -> &'static str {
        "contact-editor"
    }

    fn produce_intent(&mut self, ctx: &mut ScreenCtx<'_>) -> Option<Intent> {
        for key in ctx.input.drain() {
            match key {
                KeyPress::Char(c) => self.nickname.push(c),
                KeyPress::Backspace => {
                    self.nickname.pop();
                }
                KeyPress::Enter => return self.submit(),
                _ => {}
            }
        }
        None
    }

    fn render(&mut self, frame: &mut Frame) -> Geometry {
        match &self.mode {
            Mode::Add => frame.line("Add Contact"),
            Mode::Edit { original } => frame.line(format!("Edit Contact: {original}")),
        }
        frame.line(format!("nickname: {}", self.nickname));
        Geometry {
            lines: frame.lines.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockBackend;
    use crate::app::types::Connectivity;
    use crate::screens::InputState;

    fn produce(screen: &mut ContactEditorScreen, keys: &[KeyPress]) -> Option<Intent> {
        let mut input = InputState::new();
        for key in keys {
            input.record(*key);
        }
        let mut ctx = ScreenCtx {
            input: &mut input,
            connectivity: Connectivity::Disconnected,
        };
        screen.produce_intent(&mut ctx)
    }

    #[test]
    fn test_add_registers_contact_and_goes_back() {
        let backend = Arc::new(MockBackend::new());
        let mut screen = ContactEditorScreen::add(backend.clone());

        let mut keys: Vec<KeyPress> = "mallory".chars().map(KeyPress::Char).collect();
        keys.push(KeyPress::Enter);
        let intent = produce(&mut screen, &keys);

        assert!(matches!(intent, Some(Intent::Back)));
        assert_eq!(backend.added_contacts(), vec!["mallory".to_string()]);
    }

    #[test]
    fn test_blank_nickname_is_noop() {
        let backend = Arc::new(MockBackend::new());
        let mut screen = ContactEditorScreen::add(backend.clone());

        let keys = vec![
            KeyPress::Char(' '),
            KeyPress::Char(' '),
            KeyPress::Enter,
        ];
        let intent = produce(&mut screen, &keys);

        assert!(intent.is_none());
        assert!(backend.added_contacts().is_empty());
    }

    #[test]
    fn test_edit_renames_and_replaces_with_home() {
        let backend = Arc::new(MockBackend::new());
        backend.set_contacts(vec!["alice".to_string()]);
        let mut screen = ContactEditorScreen::edit(backend.clone(), "alice".to_string());

        let keys = vec![KeyPress::Char('2'), KeyPress::Enter];
        let intent = produce(&mut screen, &keys);

        match intent {
            Some(Intent::Replace(screen)) => assert_eq!(screen.name(), "home"),
            other => panic!("expected Replace(home), got {other:?}"),
        }
        assert_eq!(
            backend.renamed_contacts(),
            vec![("alice".to_string(), "alice2".to_string())]
        );
        assert_eq!(backend.contacts(), vec!["alice2".to_string()]);
    }

    #[test]
    fn test_edit_with_unchanged_name_issues_no_rename() {
        let backend = Arc::new(MockBackend::new());
        let mut screen = ContactEditorScreen::edit(backend.clone(), "alice".to_string());

        let intent = produce(&mut screen, &[KeyPress::Enter]);
        assert!(matches!(intent, Some(Intent::Replace(_))));
        assert!(backend.renamed_contacts().is_empty());
    }

    #[test]
    fn test_edit_prefills_nickname() {
        let backend = Arc::new(MockBackend::new());
        let screen = ContactEditorScreen::edit(backend, "alice".to_string());
        assert_eq!(screen.nickname, "alice");
    }
}
