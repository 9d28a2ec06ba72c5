//! Sliding time window of pointer samples.

use std::collections::VecDeque;
use std::time::Duration;

use cursorhome_model::CursorSample;

/// Default window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(400);

/// Ordered samples no older than `window` relative to the newest push.
#[derive(Debug, Clone)]
pub struct MotionSampleBuffer {
    samples: VecDeque<CursorSample>,
    window: Duration,
}

impl MotionSampleBuffer {
    pub fn new(window: Duration) -> Self {
        Self {
            samples: VecDeque::with_capacity(64),
            window,
        }
    }

    /// Append a sample, then evict everything outside the window.
    ///
    /// Samples are not required to be monotonic; an out-of-order sample is
    /// stored as given and eviction uses saturating arithmetic.
    pub fn push(&mut self, sample: CursorSample) {
        let now = sample.timestamp;
        self.samples.push_back(sample);

        while let Some(front) = self.samples.front() {
            if now.saturating_duration_since(front.timestamp) > self.window {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Current contents, oldest first.
    pub fn snapshot(&self) -> Vec<CursorSample> {
        self.samples.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CursorSample> + '_ {
        self.samples.iter()
    }

    /// Time between the oldest and newest retained sample.
    pub fn span(&self) -> Duration {
        match (self.samples.front(), self.samples.back()) {
            (Some(first), Some(last)) => last.timestamp.saturating_duration_since(first.timestamp),
            _ => Duration::ZERO,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }
}

impl Default for MotionSampleBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}
