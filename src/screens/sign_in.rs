//! Sign-in screen: passphrase entry and session unlock.

use std::sync::Arc;

use crate::intent::Intent;
use crate::traits::backend::{SessionFactory, MIN_PASSPHRASE_LEN};

use super::{Frame, Geometry, Screen, ScreenCtx};

pub struct SignInScreen {
    factory: Arc<dyn SessionFactory>,
    passphrase: String,
    error: Option<String>,
}

impl SignInScreen {
    pub fn new(factory: Arc<dyn SessionFactory>) -> Self {
        Self {
            factory,
            passphrase: String::new(),
            error: None,
        }
    }
}

impl Screen for SignInScreen {
    fn name(&self) -> &'static str {
        "sign-in"
    }

    fn produce_intent(&mut self, ctx: &mut ScreenCtx<'_>) -> Option<Intent> {
        use crate::events::KeyPress;

        for key in ctx.input.drain() {
            match key {
                KeyPress::Char(c) => self.passphrase.push(c),
                KeyPress::Backspace => {
                    self.passphrase.pop();
                }
                KeyPress::Enter => {
                    let passphrase = std::mem::take(&mut self.passphrase);
                    if passphrase.chars().count() < MIN_PASSPHRASE_LEN {
                        self.error = Some(format!(
                            "passphrase must be at least {MIN_PASSPHRASE_LEN} characters"
                        ));
                        return Some(Intent::Redraw);
                    }
                    return match self.factory.unlock(&passphrase) {
                        Ok(session) => Some(Intent::SignedIn(session)),
                        Err(err) => {
                            tracing::warn!(%err, "unlock failed");
                            Some(Intent::ResetSession)
                        }
                    };
                }
                _ => {}
            }
        }
        None
    }

    fn render(&mut self, frame: &mut Frame) -> Geometry {
        frame.line("Sign In");
        frame.line(format!(
            "passphrase: {}",
            "*".repeat(self.passphrase.chars().count())
        ));
        if let Some(err) = &self.error {
            frame.line(format!("error: {err}"));
        }
        Geometry {
            lines: frame.lines.len(),
        }
    }
}
