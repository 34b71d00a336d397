//! Pending-notification registry.
//!
//! One live notification per conversation key. Pushing under a key that
//! already holds one replaces it, cancelling the old notification first.
//! Every notification expires after [`NOTIFICATION_TIMEOUT`] unless replaced
//! or cancelled earlier.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::traits::notify::{NotificationHandle, Notifier};

/// How long a notification stays live before the registry cancels it.
pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(30);

struct Entry {
    handle: Arc<dyn NotificationHandle>,
    /// Generation guard: an expiry task only removes the entry it was
    /// spawned for, not a replacement that reused the key.
    seq: u64,
    expiry: JoinHandle<()>,
}

struct Inner {
    entries: Mutex<HashMap<String, Entry>>,
    next_seq: AtomicU64,
}

/// Tracks live desktop notifications keyed by conversation.
pub struct NotificationRegistry {
    notifier: Arc<dyn Notifier>,
    inner: Arc<Inner>,
    timeout: Duration,
}

fn lock_entries(inner: &Inner) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
    inner.entries.lock().unwrap_or_else(|e| e.into_inner())
}

impl NotificationRegistry {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self::with_timeout(notifier, NOTIFICATION_TIMEOUT)
    }

    pub fn with_timeout(notifier: Arc<dyn Notifier>, timeout: Duration) -> Self {
        Self {
            notifier,
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                next_seq: AtomicU64::new(0),
            }),
            timeout,
        }
    }

    /// Push a notification under `key`, replacing and cancelling any live
    /// notification already held for that key.
    ///
    /// Delivery failures are logged and swallowed; a broken notification
    /// daemon must not take the dispatch loop down.
    pub fn notify(&self, key: &str, title: &str, body: &str) {
        let handle = match self.notifier.push(title, body) {
            Ok(handle) => Arc::from(handle),
            Err(err) => {
                tracing::warn!(%err, key, "notification delivery failed");
                return;
            }
        };
        let seq = self.inner.next_seq.fetch_add(1, Ordering::Relaxed);
        let expiry = self.spawn_expiry(key.to_string(), seq);

        let old = lock_entries(&self.inner).insert(
            key.to_string(),
            Entry {
                handle,
                seq,
                expiry,
            },
        );
        if let Some(old) = old {
            old.expiry.abort();
            old.handle.cancel();
        }
    }

    /// Push a notification that is not tracked for replacement or focus
    /// cancellation. It still expires after the registry timeout.
    pub fn notify_transient(&self, title: &str, body: &str) {
        let handle: Arc<dyn NotificationHandle> = match self.notifier.push(title, body) {
            Ok(handle) => Arc::from(handle),
            Err(err) => {
                tracing::warn!(%err, "notification delivery failed");
                return;
            }
        };
        let timeout = self.timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            handle.cancel();
        });
    }

    /// Cancel and drop the live notification for `key`, if any.
    pub fn cancel(&self, key: &str) {
        let removed = lock_entries(&self.inner).remove(key);
        if let Some(entry) = removed {
            entry.expiry.abort();
            entry.handle.cancel();
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        lock_entries(&self.inner).contains_key(key)
    }

    pub fn live_count(&self) -> usize {
        lock_entries(&self.inner).len()
    }

    fn spawn_expiry(&self, key: String, seq: u64) -> JoinHandle<()> {
        let inner = self.inner.clone();
        let timeout = self.timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let expired = {
                let mut entries = lock_entries(&inner);
                match entries.get(&key) {
                    Some(entry) if entry.seq == seq => entries.remove(&key),
                    _ => None,
                }
            };
            if let Some(entry) = expired {
                entry.handle.cancel();
            }
        })
    }
}

impl Drop for NotificationRegistry {
    fn drop(&mut self) {
        let mut entries = lock_entries(&self.inner);
        for (_, entry) in entries.drain() {
            entry.expiry.abort();
            entry.handle.cancel();
        }
    }
}
