//! Frame timer.

use std::time::{Duration, Instant};

/// Measures time between frames.
///
/// ```
/// use cutekit::time::Timer;
///
/// let mut timer = Timer::new();
/// let dt = timer.tick();
/// assert!(dt >= 0.0);
/// assert!(timer.elapsed() >= dt);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Timer {
    start: Instant,
    last: Instant,
}

impl Timer {
    #[must_use]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
        }
    }

    /// Seconds since the previous tick, or since creation for the first one.
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;
        dt.as_secs_f64()
    }

    /// Seconds since creation or the last [`reset`](Self::reset).
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Time since the previous tick without consuming it.
    #[must_use]
    pub fn since_tick(&self) -> Duration {
        self.last.elapsed()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
