//! Loopback demo backend.
//!
//! Stands in for a real messaging transport so the controller can be driven
//! end to end from the terminal: any passphrase unlocks, the "echo" contact
//! repeats whatever it is sent, and connect/disconnect complete after a short
//! simulated delay.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{mpsc, Notify};

use crate::events::BackendEvent;
use crate::traits::backend::{Backend, Message, MessageId, Session, SessionFactory, UnlockError};

const CONNECT_DELAY: Duration = Duration::from_millis(300);
const ECHO_DELAY: Duration = Duration::from_millis(500);
const MAX_PAYLOAD: usize = 1000;

struct Shared {
    events: mpsc::UnboundedSender<BackendEvent>,
    messages: Mutex<HashMap<String, Vec<Message>>>,
}

impl Shared {
    fn messages(&self) -> MutexGuard<'_, HashMap<String, Vec<Message>>> {
        self.messages.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, nickname: &str, message: Message) {
        self.messages()
            .entry(nickname.to_string())
            .or_default()
            .push(message);
    }
}

pub struct LoopbackBackend {
    shared: Arc<Shared>,
    contacts: Mutex<Vec<String>>,
    next_id: AtomicU64,
    stopped_flag: AtomicBool,
    stopped: Notify,
}

impl LoopbackBackend {
    fn new(events: mpsc::UnboundedSender<BackendEvent>) -> Self {
        Self {
            shared: Arc::new(Shared {
                events,
                messages: Mutex::new(HashMap::new()),
            }),
            contacts: Mutex::new(vec!["echo".to_string()]),
            next_id: AtomicU64::new(1),
            stopped_flag: AtomicBool::new(false),
            stopped: Notify::new(),
        }
    }
}

#[async_trait]
impl Backend for LoopbackBackend {
    async fn connect(&self) {
        tokio::time::sleep(CONNECT_DELAY).await;
        let _ = self.shared.events.send(BackendEvent::ConnectionStatus {
            connected: true,
            error: None,
        });
    }

    async fn disconnect(&self) {
        tokio::time::sleep(CONNECT_DELAY).await;
        let _ = self.shared.events.send(BackendEvent::ConnectionStatus {
            connected: false,
            error: None,
        });
    }

    fn send_message(&self, nickname: &str, body: Vec<u8>) -> MessageId {
        let id = MessageId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.shared.push(
            nickname,
            Message {
                body: body.clone(),
                timestamp: Utc::now(),
                outbound: true,
                sent: true,
                delivered: false,
            },
        );
        let shared = self.shared.clone();
        let nickname = nickname.to_string();
        tokio::spawn(async move {
            let _ = shared.events.send(BackendEvent::MessageSent {
                nickname: nickname.clone(),
                message_id: id,
            });
            tokio::time::sleep(ECHO_DELAY).await;
            if let Some(record) = shared
                .messages()
                .get_mut(&nickname)
                .and_then(|msgs| msgs.iter_mut().find(|m| m.outbound && !m.delivered))
            {
                record.delivered = true;
            }
            let _ = shared.events.send(BackendEvent::MessageDelivered {
                nickname: nickname.clone(),
                message_id: id,
            });
            shared.push(
                &nickname,
                Message {
                    body,
                    timestamp: Utc::now(),
                    outbound: false,
                    sent: false,
                    delivered: false,
                },
            );
            let _ = shared
                .events
                .send(BackendEvent::MessageReceived { nickname });
        });
        id
    }

    fn max_payload_len(&self) -> usize {
        MAX_PAYLOAD
    }

    fn conversation(&self, nickname: &str) -> Vec<Message> {
        self.shared
            .messages()
            .get(nickname)
            .cloned()
            .unwrap_or_default()
    }

    fn contacts(&self) -> Vec<String> {
        self.contacts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn add_contact(&self, nickname: &str) {
        self.contacts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(nickname.to_string());
        let shared = self.shared.clone();
        let nickname = nickname.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(ECHO_DELAY).await;
            let _ = shared.events.send(BackendEvent::KeyExchangeCompleted {
                nickname,
                error: None,
            });
        });
    }

    fn rename_contact(&self, nickname: &str, new_nickname: &str) {
        for contact in self
            .contacts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter_mut()
        {
            if contact == nickname {
                *contact = new_nickname.to_string();
            }
        }
        let mut messages = self.shared.messages();
        if let Some(records) = messages.remove(nickname) {
            messages.insert(new_nickname.to_string(), records);
        }
    }

    fn auto_connect(&self) -> bool {
        true
    }

    fn shutdown(&self) {
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

/// Accepts any passphrase the sign-in screen lets through.
///
/// The loopback backend keeps no persistent state; a real backend adapter
/// would decrypt and open the state file at `state_path` here.
pub struct LoopbackSessionFactory {
    state_path: Option<PathBuf>,
}

impl LoopbackSessionFactory {
    pub fn new(state_path: Option<PathBuf>) -> Self {
        Self { state_path }
    }
}

impl SessionFactory for LoopbackSessionFactory {
    fn unlock(&self, _passphrase: &str) -> Result<Session, UnlockError> {
        tracing::debug!(state = ?self.state_path, "unlocking loopback session");
        let (tx, rx) = mpsc::unbounded_channel();
        let backend = Arc::new(LoopbackBackend::new(tx));
        Ok(Session {
            backend,
            events: rx,
        })
    }
}
