//! Navigation stack of screens.
//!
//! The last element is the active screen. The stack knows nothing about event
//! semantics; it is owned and mutated exclusively by the dispatch loop, so it
//! needs no locking.

use thiserror::Error;

use crate::screens::Screen;

/// Returned by [`NavStack::current`] before the first push, which must never
/// happen once the application has bootstrapped.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("navigation stack is empty")]
pub struct EmptyStackError;

/// Ordered history of screens; top = active.
#[derive(Default)]
pub struct NavStack {
    screens: Vec<Box<dyn Screen>>,
}

impl NavStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Append a screen; it becomes active.
    pub fn push(&mut self, screen: Box<dyn Screen>) {
        self.screens.push(screen);
    }

    /// Remove the active screen, unless it is the only one.
    ///
    /// Returns false without mutating when the stack holds one screen or
    /// fewer; after the first push the stack never drops below length 1.
    pub fn pop(&mut self) -> bool {
        if self.screens.len() > 1 {
            self.screens.pop();
            true
        } else {
            false
        }
    }

    /// Atomically replace the whole stack with `screen` and invoke its
    /// activation hook.
    pub fn clear(&mut self, mut screen: Box<dyn Screen>) {
        self.screens.clear();
        screen.on_activate();
        self.screens.push(screen);
    }

    pub fn current(&self) -> Result<&dyn Screen, EmptyStackError> {
        self.screens
            .last()
            .map(|screen| screen.as_ref())
            .ok_or(EmptyStackError)
    }

    pub fn current_mut(&mut self) -> Result<&mut (dyn Screen + 'static), EmptyStackError> {
        self.screens
            .last_mut()
            .map(|screen| screen.as_mut())
            .ok_or(EmptyStackError)
    }
}
