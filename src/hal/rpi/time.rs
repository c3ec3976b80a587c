//! Wall-clock time sources backed by std.

use crate::traits::{Clock, Delay};
use std::thread;
use std::time::{Duration, Instant};

/// Blocking delay via `thread::sleep`.
///
/// Sleeps only ever overshoot, so every protocol hold time specified as a
/// minimum is still honored.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdDelay;

impl StdDelay {
    /// Creates a new delay source.
    pub fn new() -> Self {
        Self
    }
}

impl Delay for StdDelay {
    fn delay_us(&mut self, us: u32) {
        thread::sleep(Duration::from_micros(u64::from(us)));
    }
}

/// Monotonic clock counting milliseconds since construction.
#[derive(Clone, Copy, Debug)]
pub struct StdClock {
    start: Instant,
}

impl StdClock {
    /// Creates a clock anchored at now.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StdClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
