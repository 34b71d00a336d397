//! Messaging backend abstraction.
//!
//! The backend owns the protocol, cryptography, persistence, and the message
//! records themselves. The controller issues commands through [`Backend`] and
//! observes results as [`BackendEvent`]s on the session's event channel; it
//! never duplicates backend state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::events::BackendEvent;

/// Bytes reserved for framing when truncating an outgoing payload.
pub const PAYLOAD_RESERVE: usize = 4;

/// Minimum accepted passphrase length for unlocking a session.
pub const MIN_PASSPHRASE_LEN: usize = 5;

/// Identifier the backend assigns to a queued outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(pub u64);

/// A message record owned by the backend.
///
/// Screens read these directly when rendering a conversation; delivery status
/// is never mirrored into controller state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub body: Vec<u8>,
    pub timestamp: DateTime<Utc>,
    pub outbound: bool,
    pub sent: bool,
    pub delivered: bool,
}

/// Commands the controller can issue to the messaging backend.
///
/// `connect` and `disconnect` are asynchronous and fire-and-forget: the loop
/// spawns them and the outcome arrives later as a `ConnectionStatus` event.
/// `send_message` enqueues synchronously and returns the assigned id; actual
/// transmission is reported through `MessageSent` / `MessageDelivered`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Bring the connection up. The result is reported as an event.
    async fn connect(&self);

    /// Take the connection down. The result is reported as an event.
    async fn disconnect(&self);

    /// Enqueue an outgoing message for `nickname` and return its id.
    ///
    /// Callers must truncate `body` to [`Backend::max_payload_len`] minus
    /// [`PAYLOAD_RESERVE`] before calling.
    fn send_message(&self, nickname: &str, body: Vec<u8>) -> MessageId;

    /// Fixed maximum payload length accepted by the transport.
    fn max_payload_len(&self) -> usize;

    /// The sorted message records for a conversation.
    fn conversation(&self, nickname: &str) -> Vec<Message>;

    /// Known contact nicknames.
    fn contacts(&self) -> Vec<String>;

    /// Register a new contact and start the key exchange with them.
    /// Completion is reported as a `KeyExchangeCompleted` event.
    fn add_contact(&self, nickname: &str);

    /// Rename an existing contact; the conversation history moves with it.
    fn rename_contact(&self, nickname: &str, new_nickname: &str);

    /// Whether this session asked to go online immediately after unlock.
    fn auto_connect(&self) -> bool {
        false
    }

    /// Begin an orderly backend stop. Idempotence is the caller's concern.
    fn shutdown(&self);

    /// Resolve once the backend has stopped. The dispatch loop bounds this
    /// with a timeout.
    async fn wait(&self);
}

/// An unlocked backend session: the command surface plus its event source.
pub struct Session {
    pub backend: std::sync::Arc<dyn Backend>,
    pub events: mpsc::UnboundedReceiver<BackendEvent>,
}

/// Errors from unlocking a session.
#[derive(Debug, Error)]
pub enum UnlockError {
    #[error("incorrect passphrase")]
    BadPassphrase,
    #[error("state file unreadable: {0}")]
    CorruptState(String),
}

/// Creates backend sessions from a passphrase.
///
/// The sign-in screen holds one of these; the dispatch loop keeps another
/// reference so it can rebuild the sign-in screen on session reset.
pub trait SessionFactory: Send + Sync {
    fn unlock(&self, passphrase: &str) -> Result<Session, UnlockError>;
}
