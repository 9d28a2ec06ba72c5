//! Cadence and throttling utilities for the event loop.
//!
//! All CursorHome timing runs on the monotonic clock. Components never read
//! the clock themselves; the loop passes `now` in, which keeps every state
//! machine deterministic under test.

use std::time::{Duration, Instant};

/// Interval between ticks of a timer running at `hz`.
///
/// A rate of zero is treated as 1 Hz.
pub fn interval_from_hz(hz: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / hz.max(1) as u64)
}

/// Limits an action to at most once per interval.
///
/// Used for anything that could otherwise busy-loop on a failing resource,
/// such as log-file rediscovery.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_run: Option<Instant>,
}

impl Throttle {
    /// Create a throttle allowing one run per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
        }
    }

    /// Create a throttle targeting the given Hz rate.
    pub fn from_hz(hz: u32) -> Self {
        Self::new(interval_from_hz(hz))
    }

    /// Check if enough time has passed to run again.
    /// Returns true and records `now` if ready.
    /// The first call always returns true.
    pub fn should_run(&mut self, now: Instant) -> bool {
        match self.last_run {
            None => {
                self.last_run = Some(now);
                true
            }
            Some(last) if now.saturating_duration_since(last) >= self.interval => {
                self.last_run = Some(now);
                true
            }
            _ => false,
        }
    }

    /// Record a run at `now` without asking.
    pub fn mark(&mut self, now: Instant) {
        self.last_run = Some(now);
    }

    /// Forget the last run so the next check passes.
    pub fn reset(&mut self) {
        self.last_run = None;
    }

    /// When the next run becomes allowed, if one has happened.
    pub fn next_allowed(&self) -> Option<Instant> {
        self.last_run.map(|last| last + self.interval)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
