//! Progress reporting.
//!
//! The engine reports progress at the end of each outer loop iteration in
//! each phase, with informal checkpoints near 33% (initiation), 66%
//! (iteration) and 100% (orientation). The callback is fire-and-forget: its
//! return value never influences control flow, and reported percentages are
//! clamped so they never decrease within one run.

use std::time::{Duration, Instant};

/// One progress notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEvent {
    /// Overall completion in `0.0..=100.0`, monotonically non-decreasing.
    pub percent: f64,
    /// Phase-specific auxiliary value (e.g. the current best heap score).
    pub auxiliary: f64,
    /// Time elapsed since the run started.
    pub elapsed: Duration,
}

/// Monotonic wrapper around an optional progress callback.
pub struct ProgressReporter<'a> {
    callback: Option<&'a mut dyn FnMut(ProgressEvent)>,
    started: Instant,
    last_percent: f64,
}

impl<'a> ProgressReporter<'a> {
    /// Creates a reporter; `None` disables all notifications.
    pub fn new(callback: Option<&'a mut dyn FnMut(ProgressEvent)>) -> Self {
        Self {
            callback,
            started: Instant::now(),
            last_percent: 0.0,
        }
    }

    /// Emits a notification, clamping `percent` into `[last, 100]`.
    pub fn report(&mut self, percent: f64, auxiliary: f64) {
        let percent = percent.clamp(self.last_percent, 100.0);
        self.last_percent = percent;
        if let Some(callback) = self.callback.as_mut() {
            callback(ProgressEvent {
                percent,
                auxiliary,
                elapsed: self.started.elapsed(),
            });
        }
    }
}
