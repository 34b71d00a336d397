//! Terminal-backed window system.
//!
//! Translates crossterm terminal events into [`WindowEvent`]s on the channel
//! handed to the dispatch loop, and draws submitted frames straight to
//! stdout. The terminal is always "running"; pause and resume stages never
//! occur here, so background mode is a no-op.

use std::io::{self, Write};
use std::sync::Arc;

use crossterm::cursor::MoveTo;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::events::{KeyPress, Stage, WindowEvent};
use crate::screens::Frame;
use crate::traits::window::{BackgroundMode, WindowError, WindowSys};

pub struct TerminalWindow {
    events: mpsc::UnboundedSender<WindowEvent>,
}

impl TerminalWindow {
    /// Build the window and the event channel it feeds. Spawns the input
    /// reader task immediately.
    pub fn create() -> (Arc<Self>, mpsc::UnboundedReceiver<WindowEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let window = Arc::new(Self { events: tx });
        window.seed_startup_events();
        window.spawn_input_task();
        (window, rx)
    }

    /// The terminal is visible and focused from the start; synthesize the
    /// lifecycle events a windowing system would deliver.
    fn seed_startup_events(&self) {
        let _ = self.events.send(WindowEvent::StageChanged(Stage::Running));
        let _ = self.events.send(WindowEvent::FocusChanged(true));
        let _ = self.events.send(WindowEvent::FrameRequest);
    }

    fn spawn_input_task(&self) {
        let tx = self.events.clone();
        tokio::spawn(async move {
            let mut stream = EventStream::new();
            while let Some(event) = stream.next().await {
                let event = match event {
                    Ok(event) => event,
                    Err(err) => {
                        tracing::warn!(%err, "terminal input error");
                        continue;
                    }
                };
                let Some(mapped) = map_event(event) else {
                    continue;
                };
                let destroy = matches!(mapped, WindowEvent::Destroy);
                if tx.send(mapped).is_err() || destroy {
                    break;
                }
            }
        });
    }
}

fn map_event(event: Event) -> Option<WindowEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => map_key(key),
        Event::FocusGained => Some(WindowEvent::FocusChanged(true)),
        Event::FocusLost => Some(WindowEvent::FocusChanged(false)),
        Event::Resize(_, _) => Some(WindowEvent::FrameRequest),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<WindowEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(WindowEvent::Destroy);
    }
    let press = match key.code {
        KeyCode::Char(c) => KeyPress::Char(c),
        KeyCode::Backspace => KeyPress::Backspace,
        KeyCode::Enter => KeyPress::Enter,
        KeyCode::Esc => KeyPress::Escape,
        KeyCode::Up => KeyPress::Up,
        KeyCode::Down => KeyPress::Down,
        _ => return None,
    };
    Some(WindowEvent::Key(press))
}

impl WindowSys for TerminalWindow {
    fn request_redraw(&self) {
        // the terminal has no compositor to ask; answer the request directly
        let _ = self.events.send(WindowEvent::FrameRequest);
    }

    fn submit_frame(&self, frame: Frame) {
        if let Err(err) = draw(&frame) {
            tracing::warn!(%err, "failed to draw frame");
        }
    }

    fn start_background_mode(
        &self,
        _title: &str,
        _body: &str,
    ) -> Result<BackgroundMode, WindowError> {
        Ok(BackgroundMode::new(|| {}))
    }
}

fn draw(frame: &Frame) -> io::Result<()> {
    let mut stdout = io::stdout();
    queue!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    for (row, line) in frame.lines.iter().enumerate() {
        queue!(stdout, MoveTo(0, row as u16), Print(line))?;
    }
    stdout.flush()
}
