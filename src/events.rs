//! Event types for the two external event sources.
//!
//! The dispatch loop multiplexes two channels: one carrying [`BackendEvent`]s
//! from the messaging backend, one carrying [`WindowEvent`]s from the
//! window/input system. Both are closed enums so the translators match them
//! exhaustively; there is no dynamic dispatch on event payloads.

use crate::traits::backend::MessageId;

/// Events produced by the messaging backend.
///
/// Results of asynchronous backend commands (connect, key exchange, send)
/// come back through these events rather than by mutating controller state
/// directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// Connectivity changed. Clears any "connecting" state; an accompanying
    /// error is surfaced as an additional notification.
    ConnectionStatus {
        connected: bool,
        error: Option<String>,
    },
    /// A key exchange with a peer finished, successfully or not.
    KeyExchangeCompleted {
        nickname: String,
        error: Option<String>,
    },
    /// An outgoing message could not be sent.
    MessageNotSent { nickname: String },
    /// A message arrived from a peer.
    MessageReceived { nickname: String },
    /// An outgoing message left the queue. Delivery state lives in the
    /// backend-owned message record; the controller takes no action.
    MessageSent {
        nickname: String,
        message_id: MessageId,
    },
    /// An outgoing message was acknowledged by the peer.
    MessageDelivered {
        nickname: String,
        message_id: MessageId,
    },
}

/// Events produced by the window/input system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowEvent {
    /// Input focus gained or lost.
    FocusChanged(bool),
    /// The window is being torn down; fatal for the dispatch loop.
    Destroy,
    /// The window wants a frame: handle pending input, then render.
    FrameRequest,
    /// The application lifecycle stage changed.
    StageChanged(Stage),
    /// A key press.
    Key(KeyPress),
}

/// Coarse application visibility stage reported by the window system.
///
/// Ordered by visibility so that "running or later" is expressible with a
/// comparison, as the bootstrap check requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Starting,
    Stopped,
    Paused,
    Running,
}

/// Key presses the controller cares about.
///
/// `Escape` and `Back` are handled globally by the window-event translator
/// (pop before render); everything else is forwarded to the active screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Char(char),
    Backspace,
    Enter,
    Escape,
    Back,
    Up,
    Down,
}
