//! Window/input system abstraction.
//!
//! The window collaborator produces [`crate::events::WindowEvent`]s on a
//! channel it hands the controller at construction time; this trait covers
//! the commands flowing the other way.

use thiserror::Error;

use crate::screens::Frame;

/// Errors from the window collaborator.
#[derive(Debug, Error)]
pub enum WindowError {
    #[error("background mode unavailable: {0}")]
    BackgroundMode(String),
}

/// Handle for an active background-keepalive mode.
///
/// Dropping the handle ends the mode, so the controller cannot leak a
/// keepalive past the stage transition that should end it.
pub struct BackgroundMode {
    end: Option<Box<dyn FnOnce() + Send>>,
}

impl BackgroundMode {
    pub fn new(end: impl FnOnce() + Send + 'static) -> Self {
        Self {
            end: Some(Box::new(end)),
        }
    }

    /// End background mode explicitly.
    pub fn end(mut self) {
        if let Some(end) = self.end.take() {
            end();
        }
    }
}

impl Drop for BackgroundMode {
    fn drop(&mut self) {
        if let Some(end) = self.end.take() {
            end();
        }
    }
}

/// Commands the controller issues to the window system.
pub trait WindowSys: Send + Sync {
    /// Ask for a redraw; the window answers with a `FrameRequest` event.
    fn request_redraw(&self);

    /// Present a rendered frame.
    fn submit_frame(&self, frame: Frame);

    /// Enter background-keepalive mode while the application is paused.
    fn start_background_mode(
        &self,
        title: &str,
        body: &str,
    ) -> Result<BackgroundMode, WindowError>;
}
