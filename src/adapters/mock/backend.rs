//! In-memory backend fake.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{mpsc, Notify};

use crate::events::BackendEvent;
use crate::traits::backend::{Backend, Message, MessageId, Session};

const DEFAULT_MAX_PAYLOAD: usize = 1000;

/// Records every command issued to it and serves canned conversation state.
pub struct MockBackend {
    max_payload: usize,
    auto_connect: bool,
    contacts: Mutex<Vec<String>>,
    added: Mutex<Vec<String>>,
    renamed: Mutex<Vec<(String, String)>>,
    messages: Mutex<HashMap<String, Vec<Message>>>,
    sent: Mutex<Vec<(String, Vec<u8>)>>,
    next_id: AtomicU64,
    connects: AtomicUsize,
    disconnects: AtomicUsize,
    shutdowns: AtomicUsize,
    stopped_flag: AtomicBool,
    stopped: Notify,
}

fn lock<'a, T>(mutex: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl MockBackend {
    pub fn new() -> Self {
        Self::build(DEFAULT_MAX_PAYLOAD, false)
    }

    pub fn with_max_payload(max_payload: usize) -> Self {
        Self::build(max_payload, false)
    }

    pub fn auto_connecting() -> Self {
        Self::build(DEFAULT_MAX_PAYLOAD, true)
    }

    fn build(max_payload: usize, auto_connect: bool) -> Self {
        Self {
            max_payload,
            auto_connect,
            contacts: Mutex::new(Vec::new()),
            added: Mutex::new(Vec::new()),
            renamed: Mutex::new(Vec::new()),
            messages: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            connects: AtomicUsize::new(0),
            disconnects: AtomicUsize::new(0),
            shutdowns: AtomicUsize::new(0),
            stopped_flag: AtomicBool::new(false),
            stopped: Notify::new(),
        }
    }

    /// Build a session over this backend, returning the sender side of its
    /// event channel so tests can inject backend events.
    pub fn session(backend: &Arc<Self>) -> (Session, mpsc::UnboundedSender<BackendEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Session {
            backend: backend.clone(),
            events: rx,
        };
        (session, tx)
    }

    pub fn set_contacts(&self, contacts: Vec<String>) {
        *lock(&self.contacts) = contacts;
    }

    pub fn push_message(&self, nickname: &str, message: Message) {
        lock(&self.messages)
            .entry(nickname.to_string())
            .or_default()
            .push(message);
    }

    pub fn sent_messages(&self) -> Vec<(String, Vec<u8>)> {
        lock(&self.sent).clone()
    }

    pub fn added_contacts(&self) -> Vec<String> {
        lock(&self.added).clone()
    }

    pub fn renamed_contacts(&self) -> Vec<(String, String)> {
        lock(&self.renamed).clone()
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn disconnect_count(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }

    pub fn shutdown_count(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn connect(&self) {
        self.connects.fetch_add(1, Ordering::SeqCst);
    }

    async fn disconnect(&self) {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
    }

    fn send_message(&self, nickname: &str, body: Vec<u8>) -> MessageId {
        let id = MessageId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.push_message(
            nickname,
            Message {
                body: body.clone(),
                timestamp: Utc::now(),
                outbound: true,
                sent: false,
                delivered: false,
            },
        );
        lock(&self.sent).push((nickname.to_string(), body));
        id
    }

    fn max_payload_len(&self) -> usize {
        self.max_payload
    }

    fn conversation(&self, nickname: &str) -> Vec<Message> {
        lock(&self.messages)
            .get(nickname)
            .cloned()
            .unwrap_or_default()
    }

    fn contacts(&self) -> Vec<String> {
        lock(&self.contacts).clone()
    }

    fn add_contact(&self, nickname: &str) {
        lock(&self.added).push(nickname.to_string());
        lock(&self.contacts).push(nickname.to_string());
    }

    fn rename_contact(&self, nickname: &str, new_nickname: &str) {
        lock(&self.renamed).push((nickname.to_string(), new_nickname.to_string()));
        for contact in lock(&self.contacts).iter_mut() {
            if contact == nickname {
                *contact = new_nickname.to_string();
            }
        }
        let mut messages = lock(&self.messages);
        if let Some(records) = messages.remove(nickname) {
            messages.insert(new_nickname.to_string(), records);
        }
    }

    fn auto_connect(&self) -> bool {
        self.auto_connect
    }

    fn shutdown(&self) {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        self.stopped_flag.store(true, Ordering::SeqCst);
        self.stopped.notify_waiters();
    }

    async fn wait(&self) {
        let notified = self.stopped.notified();
        if self.stopped_flag.load(Ordering::SeqCst) {
            return;
        }
        notified.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_message_records_and_ids() {
        let backend = MockBackend::new();
        let a = backend.send_message("alice", b"one".to_vec());
        let b = backend.send_message("alice", b"two".to_vec());
        assert_ne!(a, b);
        assert_eq!(backend.sent_messages().len(), 2);
        assert_eq!(backend.conversation("alice").len(), 2);
        assert!(backend.conversation("bob").is_empty());
    }

    #[tokio::test]
    async fn test_wait_resolves_after_shutdown() {
        let backend = Arc::new(MockBackend::new());
        let waiter = backend.clone();
        let handle = tokio::spawn(async move { waiter.wait().await });
        backend.shutdown();
        handle.await.unwrap();
        assert_eq!(backend.shutdown_count(), 1);
    }

    #[tokio::test]
    async fn test_wait_after_shutdown_returns_immediately() {
        let backend = MockBackend::new();
        backend.shutdown();
        backend.wait().await;
    }
}
