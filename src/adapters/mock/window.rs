//! Recording window fake.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::screens::Frame;
use crate::traits::window::{BackgroundMode, WindowError, WindowSys};

/// Counts redraw requests and keeps every submitted frame.
pub struct MockWindow {
    redraws: AtomicUsize,
    frames: Mutex<Vec<Frame>>,
    bg_started: AtomicUsize,
    bg_ended: Arc<AtomicUsize>,
    fail_bg: AtomicBool,
}

impl MockWindow {
    pub fn new() -> Self {
        Self {
            redraws: AtomicUsize::new(0),
            frames: Mutex::new(Vec::new()),
            bg_started: AtomicUsize::new(0),
            bg_ended: Arc::new(AtomicUsize::new(0)),
            fail_bg: AtomicBool::new(false),
        }
    }

    pub fn redraw_count(&self) -> usize {
        self.redraws.load(Ordering::SeqCst)
    }

    pub fn submitted_frames(&self) -> Vec<Frame> {
        self.frames.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn background_started(&self) -> usize {
        self.bg_started.load(Ordering::SeqCst)
    }

    pub fn background_ended(&self) -> usize {
        self.bg_ended.load(Ordering::SeqCst)
    }

    /// Make subsequent background-mode requests fail.
    pub fn fail_background_mode(&self) {
        self.fail_bg.store(true, Ordering::SeqCst);
    }
}

impl Default for MockWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowSys for MockWindow {
    fn request_redraw(&self) {
        self.redraws.fetch_add(1, Ordering::SeqCst);
    }

    fn submit_frame(&self, frame: Frame) {
        self.frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(frame);
    }

    fn start_background_mode(
        &self,
        _title: &str,
        _body: &str,
    ) -> Result<BackgroundMode, WindowError> {
        if self.fail_bg.load(Ordering::SeqCst) {
            return Err(WindowError::BackgroundMode("mock refusal".to_string()));
        }
        self.bg_started.fetch_add(1, Ordering::SeqCst);
        let ended = self.bg_ended.clone();
        Ok(BackgroundMode::new(move || {
            ended.fetch_add(1, Ordering::SeqCst);
        }))
    }
}
