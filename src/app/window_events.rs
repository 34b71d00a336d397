//! Window event translation.
//!
//! Raw window events become flag updates, navigation pops, and frame
//! rendering. The only events that reach the active screen are key presses,
//! and only when the next frame is produced.

use crate::error::FatalError;
use crate::events::{KeyPress, Stage, WindowEvent};
use crate::screens::{Frame, ScreenCtx, SignInScreen};

use super::App;

impl App {
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent) -> Result<(), FatalError> {
        match event {
            WindowEvent::FocusChanged(focused) => {
                self.flags.focused = focused;
                Ok(())
            }
            WindowEvent::Destroy => Err(FatalError::WindowDestroyed),
            WindowEvent::Key(KeyPress::Escape) | WindowEvent::Key(KeyPress::Back) => {
                self.back_pressed = true;
                self.window.request_redraw();
                Ok(())
            }
            WindowEvent::Key(key) => {
                self.input.record(key);
                self.window.request_redraw();
                Ok(())
            }
            WindowEvent::StageChanged(stage) => self.handle_stage_change(stage),
            WindowEvent::FrameRequest => {
                self.handle_frame_request();
                Ok(())
            }
        }
    }

    fn handle_stage_change(&mut self, stage: Stage) -> Result<(), FatalError> {
        tracing::debug!(?stage, "stage changed");
        self.flags.stage = stage;

        if stage == Stage::Paused {
            if self.background.is_none() {
                let background = self
                    .window
                    .start_background_mode("purr", "Running in the background")
                    .map_err(|err| FatalError::BackgroundMode(err.to_string()))?;
                self.background = Some(background);
            }
            return Ok(());
        }

        // keepalive only spans the paused stage
        if let Some(background) = self.background.take() {
            background.end();
        }

        if stage >= Stage::Running {
            // First time the window comes up there is nothing to show yet;
            // seed navigation with the sign-in screen.
            if self.stack.is_empty() {
                self.stack
                    .push(Box::new(SignInScreen::new(self.session_factory.clone())));
            }
            self.window.request_redraw();
        }
        Ok(())
    }

    /// Produce one frame: apply a pending back press, let the active screen
    /// interpret buffered input, then render and submit.
    fn handle_frame_request(&mut self) {
        if self.stack.is_empty() {
            return;
        }

        if std::mem::take(&mut self.back_pressed) && self.stack.pop() {
            self.window.request_redraw();
        }

        // Rendering a focused conversation means its pending notification has
        // been seen.
        if self.flags.focused {
            let peer = self
                .stack
                .current()
                .ok()
                .and_then(|screen| screen.conversation_peer().map(str::to_string));
            if let Some(peer) = peer {
                self.notifications.cancel(&peer);
            }
        }

        let connectivity = self.flags.connectivity;
        let intent = match self.stack.current_mut() {
            Ok(screen) => {
                let mut ctx = ScreenCtx {
                    input: &mut self.input,
                    connectivity,
                };
                screen.produce_intent(&mut ctx)
            }
            Err(_) => None,
        };
        if let Some(intent) = intent {
            self.apply_intent(intent);
        }

        let mut frame = Frame::new();
        if let Ok(screen) = self.stack.current_mut() {
            screen.render(&mut frame);
            self.window.submit_frame(frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockBackend, MockNotifier, MockSessionFactory, MockWindow};
    use crate::app::types::Connectivity;
    use crate::intent::Intent;

    use std::sync::Arc;

    use tokio::sync::mpsc;

    fn test_app() -> (App, Arc<MockWindow>, Arc<MockBackend>) {
        let window = Arc::new(MockWindow::new());
        let (_window_tx, window_rx) = mpsc::unbounded_channel();
        let notifier = Arc::new(MockNotifier::new());
        let backend = Arc::new(MockBackend::new());
        let factory = Arc::new(MockSessionFactory::new(backend.clone(), "hunter2"));
        let app = App::new(window.clone(), window_rx, notifier, factory);
        (app, window, backend)
    }

    fn bootstrapped_app() -> (App, Arc<MockWindow>, Arc<MockBackend>) {
        let (mut app, window, backend) = test_app();
        app.handle_window_event(WindowEvent::StageChanged(Stage::Running))
            .unwrap();
        (app, window, backend)
    }

    #[tokio::test]
    async fn test_destroy_is_fatal() {
        let (mut app, _, _) = test_app();
        let result = app.handle_window_event(WindowEvent::Destroy);
        assert!(matches!(result, Err(FatalError::WindowDestroyed)));
    }

    #[tokio::test]
    async fn test_running_stage_bootstraps_sign_in() {
        let (mut app, window, _) = test_app();
        assert!(app.stack.is_empty());

        app.handle_window_event(WindowEvent::StageChanged(Stage::Running))
            .unwrap();

        assert_eq!(app.stack.current().map(|s| s.name()), Ok("sign-in"));
        assert!(window.redraw_count() > 0);
    }

    #[tokio::test]
    async fn test_running_stage_bootstraps_only_once() {
        let (mut app, _, _) = bootstrapped_app();
        app.handle_window_event(WindowEvent::StageChanged(Stage::Running))
            .unwrap();
        assert_eq!(app.stack.len(), 1);
    }

    #[tokio::test]
    async fn test_frame_request_before_bootstrap_is_noop() {
        let (mut app, window, _) = test_app();
        app.handle_window_event(WindowEvent::FrameRequest).unwrap();
        assert_eq!(window.submitted_frames().len(), 0);
    }

    #[tokio::test]
    async fn test_pause_enters_background_mode_and_running_ends_it() {
        let (mut app, window, _) = bootstrapped_app();

        app.handle_window_event(WindowEvent::StageChanged(Stage::Paused))
            .unwrap();
        assert!(app.background.is_some());
        assert_eq!(window.background_started(), 1);
        assert_eq!(window.background_ended(), 0);

        app.handle_window_event(WindowEvent::StageChanged(Stage::Running))
            .unwrap();
        assert!(app.background.is_none());
        assert_eq!(window.background_ended(), 1);
    }

    #[tokio::test]
    async fn test_stopped_stage_ends_background_mode() {
        let (mut app, window, _) = bootstrapped_app();
        app.handle_window_event(WindowEvent::StageChanged(Stage::Paused))
            .unwrap();
        assert_eq!(window.background_started(), 1);

        app.handle_window_event(WindowEvent::StageChanged(Stage::Stopped))
            .unwrap();
        assert!(app.background.is_none());
        assert_eq!(window.background_ended(), 1);
    }

    #[tokio::test]
    async fn test_background_mode_failure_is_fatal() {
        let (mut app, window, _) = bootstrapped_app();
        window.fail_background_mode();

        let result = app.handle_window_event(WindowEvent::StageChanged(Stage::Paused));
        assert!(matches!(result, Err(FatalError::BackgroundMode(_))));
    }

    #[tokio::test]
    async fn test_escape_pops_on_next_frame() {
        let (mut app, _, backend) = bootstrapped_app();
        app.stack.push(Box::new(
            crate::screens::ConversationScreen::new(backend, "alice".to_string()),
        ));
        assert_eq!(app.stack.len(), 2);

        app.handle_window_event(WindowEvent::Key(KeyPress::Escape))
            .unwrap();
        assert_eq!(app.stack.len(), 2); // pop is deferred to the frame

        app.handle_window_event(WindowEvent::FrameRequest).unwrap();
        assert_eq!(app.stack.len(), 1);
    }

    #[tokio::test]
    async fn test_escape_at_root_does_not_pop() {
        let (mut app, _, _) = bootstrapped_app();
        app.handle_window_event(WindowEvent::Key(KeyPress::Escape))
            .unwrap();
        app.handle_window_event(WindowEvent::FrameRequest).unwrap();
        assert_eq!(app.stack.len(), 1);
    }

    #[tokio::test]
    async fn test_keys_buffer_until_frame() {
        let (mut app, window, _) = bootstrapped_app();
        app.handle_window_event(WindowEvent::Key(KeyPress::Char('a')))
            .unwrap();
        assert!(!app.input.is_empty());

        app.handle_window_event(WindowEvent::FrameRequest).unwrap();
        assert!(app.input.is_empty());
        assert_eq!(window.submitted_frames().len(), 1);
    }

    #[tokio::test]
    async fn test_focused_conversation_frame_cancels_notification() {
        let (mut app, _, backend) = bootstrapped_app();
        app.flags.focused = true;
        app.notifications.notify("alice", "Message Received", "x");
        app.stack.push(Box::new(
            crate::screens::ConversationScreen::new(backend, "alice".to_string()),
        ));

        app.handle_window_event(WindowEvent::FrameRequest).unwrap();
        assert!(!app.notifications.contains("alice"));
    }

    #[tokio::test]
    async fn test_unfocused_frame_keeps_notification() {
        let (mut app, _, backend) = bootstrapped_app();
        app.flags.focused = false;
        app.notifications.notify("alice", "Message Received", "x");
        app.stack.push(Box::new(
            crate::screens::ConversationScreen::new(backend, "alice".to_string()),
        ));

        app.handle_window_event(WindowEvent::FrameRequest).unwrap();
        assert!(app.notifications.contains("alice"));
    }

    #[tokio::test]
    async fn test_frame_applies_screen_intent() {
        let (mut app, _, _) = bootstrapped_app();
        // home requires a session; drive the sign-in screen instead
        for c in "hunter2".chars() {
            app.handle_window_event(WindowEvent::Key(KeyPress::Char(c)))
                .unwrap();
        }
        app.handle_window_event(WindowEvent::Key(KeyPress::Enter))
            .unwrap();
        app.handle_window_event(WindowEvent::FrameRequest).unwrap();

        assert_eq!(app.stack.current().map(|s| s.name()), Ok("home"));
        assert!(app.backend.is_some());
        assert_ne!(app.flags.connectivity, Connectivity::Connected);
    }

    #[tokio::test]
    async fn test_focus_event_sets_flag() {
        let (mut app, _, _) = test_app();
        app.handle_window_event(WindowEvent::FocusChanged(true))
            .unwrap();
        assert!(app.flags.focused);
        app.handle_window_event(WindowEvent::FocusChanged(false))
            .unwrap();
        assert!(!app.flags.focused);
    }

    #[tokio::test]
    async fn test_intent_back_pops_pushed_screen() {
        let (mut app, _, backend) = bootstrapped_app();
        app.stack.push(Box::new(
            crate::screens::ConversationScreen::new(backend, "alice".to_string()),
        ));
        app.apply_intent(Intent::Back);
        assert_eq!(app.stack.len(), 1);
    }
}
