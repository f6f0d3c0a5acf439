//! Self-scheduled frame loop with cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::session::RenderSession;

/// Target tick interval, roughly 60 Hz. Not a hard deadline.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Drives [`RenderSession::frame_tick`] at a bounded cadence until
/// cancelled. Cancellation is checked between frames only, so an
/// in-flight frame always completes.
pub struct FrameLoop {
    session: Arc<RenderSession>,
    active: Arc<AtomicBool>,
}

impl FrameLoop {
    pub fn new(session: Arc<RenderSession>) -> Self {
        Self {
            session,
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn handle(&self) -> FrameLoopHandle {
        FrameLoopHandle {
            active: self.active.clone(),
        }
    }

    /// Runs until the handle cancels. Intended for a dedicated thread.
    pub fn run(self) {
        while self.active.load(Ordering::Relaxed) {
            let started = Instant::now();
            self.session.frame_tick();
            if let Some(remaining) = FRAME_INTERVAL.checked_sub(started.elapsed()) {
                thread::sleep(remaining);
            }
        }
        log::debug!("frame loop stopped");
    }
}

/// Cancellation handle for a running [`FrameLoop`].
#[derive(Clone)]
pub struct FrameLoopHandle {
    active: Arc<AtomicBool>,
}

impl FrameLoopHandle {
    pub fn cancel(&self) {
        self.active.store(false, Ordering::Relaxed);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}
