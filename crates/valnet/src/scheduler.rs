//! Throttled redraw scheduling.
//!
//! Layout runs, drags and zooms can each ask for a redraw many times per
//! frame. [`RedrawScheduler`] lets the first request of a window through
//! immediately, folds the rest into a single pending redraw, and releases it
//! once the window has passed. Time is passed in by the caller.

use std::time::{Duration, Instant};

use log::trace;

/// Default redraw rate.
pub const DEFAULT_FPS: u32 = 25;

/// Coalescing leading+trailing edge throttle for redraw requests.
#[derive(Debug, Clone)]
pub struct RedrawScheduler {
    window: Duration,
    last_emit: Option<Instant>,
    pending: bool,
}

impl RedrawScheduler {
    /// Scheduler allowing at most `fps` redraws per second.
    ///
    /// The window is `floor(1000 / fps)` milliseconds. An `fps` of zero is
    /// treated as one.
    pub fn with_fps(fps: u32) -> Self {
        let fps = fps.max(1);
        Self {
            window: Duration::from_millis(u64::from(1000 / fps)),
            last_emit: None,
            pending: false,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Asks for a redraw at `now`.
    ///
    /// Returns `true` when the caller should redraw right away. Otherwise the
    /// request is remembered (at most once) for a later [`poll`](Self::poll).
    pub fn request(&mut self, now: Instant) -> bool {
        if self.window_elapsed(now) {
            self.last_emit = Some(now);
            self.pending = false;
            return true;
        }
        if !self.pending {
            trace!("Redraw deferred");
        }
        self.pending = true;
        false
    }

    /// Releases the pending redraw once its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.pending && self.window_elapsed(now) {
            self.pending = false;
            self.last_emit = Some(now);
            return true;
        }
        false
    }

    /// Releases the pending redraw immediately, ignoring the window.
    pub fn flush(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Drops the pending redraw, if any.
    pub fn cancel(&mut self) {
        self.pending = false;
    }

    fn window_elapsed(&self, now: Instant) -> bool {
        match self.last_emit {
            Some(last) => now.saturating_duration_since(last) >= self.window,
            None => true,
        }
    }
}

impl Default for RedrawScheduler {
    fn default() -> Self {
        Self::with_fps(DEFAULT_FPS)
    }
}
