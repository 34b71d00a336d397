//! End-to-end navigation: sign in, add a contact, converse, back out.
//!
//! Every event arrives on the window channel, so ordering is deterministic.

use std::sync::Arc;

use tokio::sync::mpsc;

use purr::adapters::mock::{MockBackend, MockNotifier, MockSessionFactory, MockWindow};
use purr::app::App;
use purr::error::FatalError;
use purr::events::{KeyPress, Stage, WindowEvent};
use purr::screens::Frame;

struct Harness {
    app: App,
    window: Arc<MockWindow>,
    backend: Arc<MockBackend>,
    tx: mpsc::UnboundedSender<WindowEvent>,
}

fn harness() -> Harness {
    let window = Arc::new(MockWindow::new());
    let (tx, rx) = mpsc::unbounded_channel();
    let notifier = Arc::new(MockNotifier::new());
    let backend = Arc::new(MockBackend::new());
    let factory = Arc::new(MockSessionFactory::new(backend.clone(), "hunter2"));
    let app = App::new(window.clone(), rx, notifier, factory);
    Harness {
        app,
        window,
        backend,
        tx,
    }
}

fn send_keys(tx: &mpsc::UnboundedSender<WindowEvent>, text: &str) {
    for c in text.chars() {
        tx.send(WindowEvent::Key(KeyPress::Char(c))).unwrap();
    }
}

fn frame_with_header<'a>(frames: &'a [Frame], header: &str) -> Option<&'a Frame> {
    frames
        .iter()
        .find(|f| f.lines.first().map(String::as_str) == Some(header))
}

#[tokio::test]
async fn test_full_session_flow() {
    let mut h = harness();
    let tx = h.tx.clone();

    // boot: window comes up running and focused
    tx.send(WindowEvent::StageChanged(Stage::Running)).unwrap();
    tx.send(WindowEvent::FocusChanged(true)).unwrap();
    tx.send(WindowEvent::FrameRequest).unwrap(); // renders sign-in

    // unlock
    send_keys(&tx, "hunter2");
    tx.send(WindowEvent::Key(KeyPress::Enter)).unwrap();
    tx.send(WindowEvent::FrameRequest).unwrap(); // signs in, renders home

    // add a contact
    send_keys(&tx, "a");
    tx.send(WindowEvent::FrameRequest).unwrap(); // pushes editor
    send_keys(&tx, "alice");
    tx.send(WindowEvent::Key(KeyPress::Enter)).unwrap();
    tx.send(WindowEvent::FrameRequest).unwrap(); // adds, pops to home

    // open the conversation and send a message
    tx.send(WindowEvent::Key(KeyPress::Enter)).unwrap();
    tx.send(WindowEvent::FrameRequest).unwrap(); // pushes conversation
    send_keys(&tx, "hi");
    tx.send(WindowEvent::Key(KeyPress::Enter)).unwrap();
    tx.send(WindowEvent::FrameRequest).unwrap(); // submits

    // back out and quit
    tx.send(WindowEvent::Key(KeyPress::Escape)).unwrap();
    tx.send(WindowEvent::FrameRequest).unwrap(); // pops to home
    tx.send(WindowEvent::Destroy).unwrap();

    let result = h.app.run().await;
    assert!(matches!(result, Err(FatalError::WindowDestroyed)));

    assert_eq!(h.backend.added_contacts(), vec!["alice".to_string()]);
    assert_eq!(
        h.backend.sent_messages(),
        vec![("alice".to_string(), b"hi".to_vec())]
    );
    assert_eq!(h.backend.shutdown_count(), 1);

    let frames = h.window.submitted_frames();
    assert!(frame_with_header(&frames, "Sign In").is_some());
    assert!(frame_with_header(&frames, "Contacts").is_some());
    assert!(frame_with_header(&frames, "Add Contact").is_some());
    let conversation =
        frame_with_header(&frames, "Conversation with alice").expect("conversation frame");
    assert!(conversation.lines.iter().any(|l| l.starts_with("> ")));
}

#[tokio::test]
async fn test_escape_at_home_stays_on_home() {
    let mut h = harness();
    let tx = h.tx.clone();

    tx.send(WindowEvent::StageChanged(Stage::Running)).unwrap();
    send_keys(&tx, "hunter2");
    tx.send(WindowEvent::Key(KeyPress::Enter)).unwrap();
    tx.send(WindowEvent::FrameRequest).unwrap();
    tx.send(WindowEvent::Key(KeyPress::Escape)).unwrap();
    tx.send(WindowEvent::FrameRequest).unwrap();
    tx.send(WindowEvent::Destroy).unwrap();

    let _ = h.app.run().await;
    let frames = h.window.submitted_frames();
    // the last frame is still home
    assert_eq!(
        frames.last().and_then(|f| f.lines.first()).map(String::as_str),
        Some("Contacts")
    );
}

#[tokio::test]
async fn test_sign_out_returns_to_sign_in() {
    let mut h = harness();
    let tx = h.tx.clone();

    tx.send(WindowEvent::StageChanged(Stage::Running)).unwrap();
    send_keys(&tx, "hunter2");
    tx.send(WindowEvent::Key(KeyPress::Enter)).unwrap();
    tx.send(WindowEvent::FrameRequest).unwrap(); // home

    send_keys(&tx, "s");
    tx.send(WindowEvent::FrameRequest).unwrap(); // settings
    send_keys(&tx, "x");
    tx.send(WindowEvent::FrameRequest).unwrap(); // resets to sign-in
    tx.send(WindowEvent::Destroy).unwrap();

    let result = h.app.run().await;
    assert!(matches!(result, Err(FatalError::WindowDestroyed)));
    tokio::task::yield_now().await;

    let frames = h.window.submitted_frames();
    assert_eq!(
        frames.last().and_then(|f| f.lines.first()).map(String::as_str),
        Some("Sign In")
    );
    // signing out restarts the backend
    assert_eq!(h.backend.shutdown_count(), 1);
}

#[tokio::test]
async fn test_wrong_passphrase_stays_on_sign_in() {
    let mut h = harness();
    let tx = h.tx.clone();

    tx.send(WindowEvent::StageChanged(Stage::Running)).unwrap();
    send_keys(&tx, "swordfish");
    tx.send(WindowEvent::Key(KeyPress::Enter)).unwrap();
    tx.send(WindowEvent::FrameRequest).unwrap();
    tx.send(WindowEvent::Destroy).unwrap();

    let result = h.app.run().await;
    assert!(matches!(result, Err(FatalError::WindowDestroyed)));
    assert_eq!(h.backend.shutdown_count(), 0);

    let frames = h.window.submitted_frames();
    assert_eq!(
        frames.last().and_then(|f| f.lines.first()).map(String::as_str),
        Some("Sign In")
    );
}
