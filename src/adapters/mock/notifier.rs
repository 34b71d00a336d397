//! Recording notifier fake.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::traits::notify::{NotificationHandle, Notifier, NotifyError};

struct HandleState {
    title: String,
    body: String,
    cancelled: AtomicBool,
}

struct MockHandle(Arc<HandleState>);

impl NotificationHandle for MockHandle {
    fn cancel(&self) {
        self.0.cancelled.store(true, Ordering::SeqCst);
    }
}

/// Records every pushed notification and whether it was later cancelled.
pub struct MockNotifier {
    pushed: Mutex<Vec<Arc<HandleState>>>,
    fail: bool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            pushed: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// A notifier whose every push fails with a delivery error.
    pub fn failing() -> Self {
        Self {
            pushed: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    fn states(&self) -> std::sync::MutexGuard<'_, Vec<Arc<HandleState>>> {
        self.pushed.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push_count(&self) -> usize {
        self.states().len()
    }

    pub fn cancelled_count(&self) -> usize {
        self.states()
            .iter()
            .filter(|s| s.cancelled.load(Ordering::SeqCst))
            .count()
    }

    pub fn titles(&self) -> Vec<String> {
        self.states().iter().map(|s| s.title.clone()).collect()
    }

    pub fn bodies(&self) -> Vec<String> {
        self.states().iter().map(|s| s.body.clone()).collect()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for MockNotifier {
    fn push(&self, title: &str, body: &str) -> Result<Box<dyn NotificationHandle>, NotifyError> {
        if self.fail {
            return Err(NotifyError::Delivery("mock failure".to_string()));
        }
        let state = Arc::new(HandleState {
            title: title.to_string(),
            body: body.to_string(),
            cancelled: AtomicBool::new(false),
        });
        self.states().push(state.clone());
        Ok(Box::new(MockHandle(state)))
    }
}
