//! The dispatch loop: single thread of control over all controller state.
//!
//! All mutation of the navigation stack, flags, and notification registry
//! happens here, driven by three sources multiplexed in one `select!`: the
//! backend event channel, the window event channel, and a periodic redraw
//! tick that keeps relative timestamps fresh. Before a session is unlocked
//! there is no backend channel and the loop consumes window events only.

mod backend_events;
pub mod types;
mod window_events;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant};

use crate::error::FatalError;
use crate::events::WindowEvent;
use crate::intent::Intent;
use crate::notifications::NotificationRegistry;
use crate::screens::{HomeScreen, InputState, SignInScreen};
use crate::stack::NavStack;
use crate::traits::backend::{Backend, Session, SessionFactory};
use crate::traits::notify::Notifier;
use crate::traits::window::{BackgroundMode, WindowSys};

use types::{AppFlags, Connectivity};

/// Period of the timer tick that forces a redraw so relative message ages
/// stay current.
pub const REDRAW_PERIOD: Duration = Duration::from_secs(60);

/// Upper bound on waiting for the backend to stop during shutdown.
pub const SHUTDOWN_WAIT: Duration = Duration::from_secs(5);

pub struct App {
    window: Arc<dyn WindowSys>,
    window_rx: Option<mpsc::UnboundedReceiver<WindowEvent>>,
    session_factory: Arc<dyn SessionFactory>,
    notifications: NotificationRegistry,
    stack: NavStack,
    input: InputState,
    flags: AppFlags,
    backend: Option<Arc<dyn Backend>>,
    backend_rx: Option<mpsc::UnboundedReceiver<crate::events::BackendEvent>>,
    background: Option<BackgroundMode>,
    back_pressed: bool,
    shutdown_issued: bool,
}

impl App {
    pub fn new(
        window: Arc<dyn WindowSys>,
        window_rx: mpsc::UnboundedReceiver<WindowEvent>,
        notifier: Arc<dyn Notifier>,
        session_factory: Arc<dyn SessionFactory>,
    ) -> Self {
        Self {
            window,
            window_rx: Some(window_rx),
            session_factory,
            notifications: NotificationRegistry::new(notifier),
            stack: NavStack::new(),
            input: InputState::new(),
            flags: AppFlags::new(),
            backend: None,
            backend_rx: None,
            background: None,
            back_pressed: false,
            shutdown_issued: false,
        }
    }

    /// Run the dispatch loop until a fatal condition, then release the
    /// backend. Always returns an error; window destruction is the normal
    /// exit and is mapped by the caller.
    pub async fn run(&mut self) -> Result<(), FatalError> {
        let result = self.dispatch().await;
        if let Err(err) = &result {
            tracing::info!(%err, "dispatch loop ended");
        }
        self.release_backend().await;
        result
    }

    async fn dispatch(&mut self) -> Result<(), FatalError> {
        let mut window_rx = self
            .window_rx
            .take()
            .ok_or(FatalError::WindowChannelClosed)?;

        loop {
            // No session yet (or the session was reset): window events only.
            while self.backend_rx.is_none() {
                let event = window_rx
                    .recv()
                    .await
                    .ok_or(FatalError::WindowChannelClosed)?;
                self.handle_window_event(event)?;
            }

            let mut backend_rx = self
                .backend_rx
                .take()
                .ok_or(FatalError::BackendChannelClosed)?;
            let mut redraw = interval_at(Instant::now() + REDRAW_PERIOD, REDRAW_PERIOD);

            loop {
                tokio::select! {
                    maybe_event = backend_rx.recv() => {
                        let event = maybe_event.ok_or(FatalError::BackendChannelClosed)?;
                        self.handle_backend_event(event);
                    }
                    maybe_event = window_rx.recv() => {
                        let event = maybe_event.ok_or(FatalError::WindowChannelClosed)?;
                        self.handle_window_event(event)?;
                    }
                    _ = redraw.tick() => {
                        self.window.request_redraw();
                    }
                }

                // A session reset drops the backend; fall back to the
                // window-only phase until the next sign-in.
                if self.backend.is_none() {
                    break;
                }
            }
        }
    }

    pub(crate) fn apply_intent(&mut self, intent: Intent) {
        tracing::debug!(?intent, "applying intent");
        match intent {
            Intent::Redraw => self.window.request_redraw(),
            Intent::Back => {
                if self.stack.pop() {
                    self.window.request_redraw();
                }
            }
            Intent::Push(screen) => {
                self.stack.push(screen);
                self.window.request_redraw();
            }
            Intent::Replace(screen) => {
                self.stack.clear(screen);
                self.window.request_redraw();
            }
            Intent::SignedIn(session) => self.install_session(session),
            Intent::ResetSession => self.reset_session(),
            Intent::Connect => {
                if let Some(backend) = &self.backend {
                    self.flags.connectivity = Connectivity::Connecting;
                    let backend = backend.clone();
                    tokio::spawn(async move { backend.connect().await });
                }
                self.window.request_redraw();
            }
            Intent::Disconnect => {
                if let Some(backend) = &self.backend {
                    let backend = backend.clone();
                    tokio::spawn(async move { backend.disconnect().await });
                }
                self.window.request_redraw();
            }
            Intent::MessageSent {
                nickname,
                message_id,
            } => {
                tracing::debug!(nickname, id = message_id.0, "message enqueued");
                self.window.request_redraw();
            }
        }
    }

    fn install_session(&mut self, session: Session) {
        let backend = session.backend;
        self.backend_rx = Some(session.events);
        if backend.auto_connect() {
            self.flags.connectivity = Connectivity::Connecting;
            let connecting = backend.clone();
            tokio::spawn(async move { connecting.connect().await });
        }
        self.stack.clear(Box::new(HomeScreen::new(backend.clone())));
        self.backend = Some(backend);
        self.window.request_redraw();
    }

    fn reset_session(&mut self) {
        if let Some(backend) = self.backend.take() {
            tokio::spawn(async move {
                backend.shutdown();
                backend.wait().await;
            });
        }
        self.backend_rx = None;
        self.flags.reset_session();
        self.stack
            .clear(Box::new(SignInScreen::new(self.session_factory.clone())));
        self.window.request_redraw();
    }

    /// Orderly backend stop, bounded by [`SHUTDOWN_WAIT`]. Safe to call more
    /// than once; only the first call acts.
    async fn release_backend(&mut self) {
        if self.shutdown_issued {
            return;
        }
        self.shutdown_issued = true;
        let Some(backend) = self.backend.take() else {
            return;
        };
        backend.shutdown();
        if tokio::time::timeout(SHUTDOWN_WAIT, backend.wait())
            .await
            .is_err()
        {
            tracing::warn!("backend did not stop in time, abandoning it");
        }
    }
}
