//! Shake-to-find gesture detection.
//!
//! A shake is rapid horizontal back-and-forth motion: several direction
//! reversals inside a short window, at a speed the user would not reach
//! while simply moving the pointer somewhere.

use std::time::{Duration, Instant};

use cursorhome_common::config::ShakeSettings;
use cursorhome_model::{CursorSample, Point, Rect};

use crate::buffer::MotionSampleBuffer;
use crate::guard::{EdgeTransitionGuard, GuardConfig};

/// Velocity threshold at sensitivity 0.0 (px/s).
pub const LEAST_SENSITIVE_THRESHOLD: f64 = 900.0;
/// Velocity threshold at sensitivity 1.0 (px/s).
pub const MOST_SENSITIVE_THRESHOLD: f64 = 300.0;
/// Samples needed before the window is evaluated.
pub const MIN_SAMPLES: usize = 4;

/// Tuning for [`ShakeGestureDetector`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShakeConfig {
    /// 0.0 (least) to 1.0 (most). Expected to be clamped already.
    pub sensitivity: f64,
    pub window: Duration,
    pub min_direction_changes: usize,
    pub guard: GuardConfig,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.5,
            window: Duration::from_millis(400),
            min_direction_changes: 4,
            guard: GuardConfig::default(),
        }
    }
}

impl From<&ShakeSettings> for ShakeConfig {
    fn from(settings: &ShakeSettings) -> Self {
        Self {
            sensitivity: settings.sensitivity,
            window: settings.window(),
            min_direction_changes: settings.min_direction_changes,
            guard: GuardConfig::from(settings),
        }
    }
}

impl ShakeConfig {
    /// Minimum horizontal speed for a shake, interpolated linearly
    /// between 900 px/s and 300 px/s.
    pub fn velocity_threshold(&self) -> f64 {
        LEAST_SENSITIVE_THRESHOLD
            - self.sensitivity * (LEAST_SENSITIVE_THRESHOLD - MOST_SENSITIVE_THRESHOLD)
    }
}

/// A detected shake.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShakeEvent {
    /// Timestamp of the sample that completed the gesture.
    pub at: Instant,
    /// Pointer location at that sample.
    pub origin: Point,
}

/// Where the detector is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    /// No history.
    Idle,
    /// Collecting samples inside the window.
    Accumulating,
    /// The guard is holding detection off.
    Suppressed,
}

/// Summary of one window evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub direction_changes: usize,
    pub horizontal_distance: f64,
    pub elapsed: Duration,
}

impl WindowStats {
    /// Horizontal speed over the window, or `None` when no time elapsed.
    pub fn velocity(&self) -> Option<f64> {
        let secs = self.elapsed.as_secs_f64();
        (secs > 0.0).then(|| self.horizontal_distance / secs)
    }
}

/// Measure reversals and horizontal travel across consecutive samples.
///
/// A reversal is counted only between two adjacent non-zero deltas of
/// opposite sign.
pub fn window_stats(samples: &[CursorSample]) -> WindowStats {
    let mut direction_changes = 0;
    let mut horizontal_distance = 0.0;
    let mut prev_dx: Option<f64> = None;

    for pair in samples.windows(2) {
        let dx = pair[1].point.x - pair[0].point.x;
        horizontal_distance += dx.abs();
        if let Some(prev) = prev_dx {
            if (dx > 0.0 && prev < 0.0) || (dx < 0.0 && prev > 0.0) {
                direction_changes += 1;
            }
        }
        prev_dx = Some(dx);
    }

    let elapsed = match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => last.timestamp.saturating_duration_since(first.timestamp),
        _ => Duration::ZERO,
    };

    WindowStats {
        direction_changes,
        horizontal_distance,
        elapsed,
    }
}

/// Classifies pointer samples into shake events.
#[derive(Debug, Clone)]
pub struct ShakeGestureDetector {
    config: ShakeConfig,
    buffer: MotionSampleBuffer,
    guard: EdgeTransitionGuard,
    last_timestamp: Option<Instant>,
}

impl ShakeGestureDetector {
    pub fn new(config: ShakeConfig, display_bounds: Vec<Rect>) -> Self {
        let buffer = MotionSampleBuffer::new(config.window);
        let guard = EdgeTransitionGuard::new(config.guard, display_bounds);
        Self {
            config,
            buffer,
            guard,
            last_timestamp: None,
        }
    }

    pub fn from_settings(settings: &ShakeSettings, display_bounds: Vec<Rect>) -> Self {
        Self::new(ShakeConfig::from(settings), display_bounds)
    }

    /// Feed one sample. Returns an event when this sample completes a shake.
    ///
    /// History is cleared whenever the guard suppresses and after every
    /// fire, so one physical shake yields one event.
    pub fn on_sample(&mut self, sample: CursorSample) -> Option<ShakeEvent> {
        self.last_timestamp = Some(sample.timestamp);

        if self.guard.observe(&sample) {
            if !self.buffer.is_empty() {
                tracing::trace!(discarded = self.buffer.len(), "Shake history discarded");
            }
            self.buffer.clear();
            return None;
        }

        self.buffer.push(sample);
        if self.buffer.len() < MIN_SAMPLES {
            return None;
        }

        let samples = self.buffer.snapshot();
        let stats = window_stats(&samples);
        let velocity = stats.velocity()?;

        if stats.direction_changes >= self.config.min_direction_changes
            && velocity > self.config.velocity_threshold()
        {
            self.buffer.clear();
            tracing::debug!(
                direction_changes = stats.direction_changes,
                velocity = velocity.round(),
                threshold = self.config.velocity_threshold(),
                "Shake detected"
            );
            return Some(ShakeEvent {
                at: sample.timestamp,
                origin: sample.point,
            });
        }

        None
    }

    /// Current state as of the most recent sample.
    pub fn state(&self) -> DetectorState {
        match self.last_timestamp {
            Some(now) if self.guard.is_suppressing(now) => DetectorState::Suppressed,
            _ if self.buffer.is_empty() => DetectorState::Idle,
            _ => DetectorState::Accumulating,
        }
    }

    /// Open a suppression window, e.g. right after the engine warps the
    /// pointer itself.
    pub fn suppress_from(&mut self, now: Instant) {
        self.guard.suppress_from(now);
        self.buffer.clear();
    }

    pub fn set_sensitivity(&mut self, sensitivity: f64) {
        self.config.sensitivity = sensitivity;
    }

    pub fn set_display_bounds(&mut self, bounds: Vec<Rect>) {
        self.guard.set_display_bounds(bounds);
    }

    /// Apply new tuning. History is kept; the window length takes effect
    /// on the next push.
    pub fn reconfigure(&mut self, config: ShakeConfig) {
        self.buffer.set_window(config.window);
        self.guard.set_config(config.guard);
        self.config = config;
    }

    pub fn config(&self) -> &ShakeConfig {
        &self.config
    }

    /// Drop history and cooldown.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.guard.reset();
        self.last_timestamp = None;
    }
}
