//! Fatal error conditions that unwind the dispatch loop.
//!
//! Everything else in the controller is recoverable: backend failures become
//! transient notifications, bad input is dropped, and session problems reset
//! navigation to the sign-in screen. Only the conditions here terminate the
//! process.

use thiserror::Error;

/// Errors that end the dispatch loop and trigger the shutdown sequence.
#[derive(Debug, Error)]
pub enum FatalError {
    /// The window system reported a terminal destroy event.
    #[error("window system destroyed")]
    WindowDestroyed,

    /// The window event channel closed; no further input can arrive.
    #[error("window event channel closed")]
    WindowChannelClosed,

    /// The backend event channel closed without a destroy event.
    #[error("backend event channel closed")]
    BackendChannelClosed,

    /// The window collaborator refused to enter background-keepalive mode.
    #[error("failed to enter background mode: {0}")]
    BackgroundMode(String),
}
