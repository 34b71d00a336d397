//! Session factory fake with a fixed passphrase.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::events::BackendEvent;
use crate::adapters::mock::MockBackend;
use crate::traits::backend::{Session, SessionFactory, UnlockError};

/// Unlocks a [`MockBackend`] session when given the configured passphrase.
pub struct MockSessionFactory {
    backend: Arc<MockBackend>,
    passphrase: String,
    attempts: AtomicUsize,
    events_tx: Mutex<Option<mpsc::UnboundedSender<BackendEvent>>>,
}

impl MockSessionFactory {
    pub fn new(backend: Arc<MockBackend>, passphrase: &str) -> Self {
        Self {
            backend,
            passphrase: passphrase.to_string(),
            attempts: AtomicUsize::new(0),
            events_tx: Mutex::new(None),
        }
    }

    pub fn unlock_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Sender side of the most recently unlocked session's event channel.
    pub fn events_tx(&self) -> Option<mpsc::UnboundedSender<BackendEvent>> {
        self.events_tx
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Drop the stored sender so the session's event channel can close.
    pub fn close_events(&self) {
        *self.events_tx.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl SessionFactory for MockSessionFactory {
    fn unlock(&self, passphrase: &str) -> Result<Session, UnlockError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if passphrase != self.passphrase {
            return Err(UnlockError::BadPassphrase);
        }
        let (session, tx) = MockBackend::session(&self.backend);
        *self.events_tx.lock().unwrap_or_else(|e| e.into_inner()) = Some(tx);
        Ok(session)
    }
}
