//! Trait abstractions for external collaborators.
//!
//! The controller never talks to the messaging backend, the window system, or
//! the desktop notification service directly; it goes through these traits so
//! that every collaborator can be replaced by a mock in tests.

pub mod backend;
pub mod notify;
pub mod window;

pub use backend::{
    Backend, Message, MessageId, Session, SessionFactory, UnlockError, MIN_PASSPHRASE_LEN,
    PAYLOAD_RESERVE,
};
pub use notify::{NotificationHandle, Notifier, NotifyError};
pub use window::{BackgroundMode, WindowError, WindowSys};
