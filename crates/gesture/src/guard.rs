//! Suppression of gesture detection after synthetic pointer moves.
//!
//! A KVM tool warping the pointer across a seam, or our own
//! teleport-to-center, produces motion that looks nothing like a hand on a
//! mouse: one huge step, or motion hugging a display edge. The guard spots
//! both and opens a cooldown during which the shake detector must ignore
//! input.

use std::time::{Duration, Instant};

use cursorhome_common::config::ShakeSettings;
use cursorhome_model::{CursorSample, Point, Rect};

/// Thresholds for the edge transition guard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuardConfig {
    /// Single-step distance treated as a warp (px).
    pub jump_threshold: f64,
    /// Distance from any display edge treated as a seam crossing (px).
    pub edge_margin: f64,
    /// How long suppression lasts after a trigger.
    pub cooldown: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            jump_threshold: 200.0,
            edge_margin: 50.0,
            cooldown: Duration::from_millis(500),
        }
    }
}

impl From<&ShakeSettings> for GuardConfig {
    fn from(settings: &ShakeSettings) -> Self {
        Self {
            jump_threshold: settings.jump_threshold_px,
            edge_margin: settings.edge_margin_px,
            cooldown: settings.cooldown(),
        }
    }
}

/// Tracks the last observed location and the end of the current cooldown.
#[derive(Debug, Clone)]
pub struct EdgeTransitionGuard {
    config: GuardConfig,
    display_bounds: Vec<Rect>,
    last_location: Option<Point>,
    cooldown_until: Option<Instant>,
}

impl EdgeTransitionGuard {
    pub fn new(config: GuardConfig, display_bounds: Vec<Rect>) -> Self {
        Self {
            config,
            display_bounds,
            last_location: None,
            cooldown_until: None,
        }
    }

    /// Observe one sample and report whether detection is suppressed.
    ///
    /// A trigger extends the cooldown to `max(current, now + cooldown)`;
    /// the deadline never moves backwards.
    pub fn observe(&mut self, sample: &CursorSample) -> bool {
        let now = sample.timestamp;
        let point = sample.point;

        let jumped = self
            .last_location
            .map(|last| last.distance_to(&point) > self.config.jump_threshold)
            .unwrap_or(false);
        let at_edge = self
            .display_bounds
            .iter()
            .any(|bounds| bounds.near_edge(point, self.config.edge_margin));
        self.last_location = Some(point);

        if jumped || at_edge {
            self.extend_cooldown(now + self.config.cooldown);
            tracing::trace!(
                x = point.x,
                y = point.y,
                jumped,
                at_edge,
                "Gesture suppression triggered"
            );
            return true;
        }

        self.is_suppressing(now)
    }

    /// Whether `now` falls inside the current cooldown.
    pub fn is_suppressing(&self, now: Instant) -> bool {
        self.cooldown_until.is_some_and(|until| now < until)
    }

    /// Open a cooldown from outside, e.g. right after warping the pointer.
    pub fn suppress_from(&mut self, now: Instant) {
        self.extend_cooldown(now + self.config.cooldown);
    }

    /// End of the current cooldown, if one was ever opened.
    pub fn cooldown_until(&self) -> Option<Instant> {
        self.cooldown_until
    }

    /// Replace the display rectangles used for edge tests.
    pub fn set_display_bounds(&mut self, bounds: Vec<Rect>) {
        self.display_bounds = bounds;
    }

    pub fn set_config(&mut self, config: GuardConfig) {
        self.config = config;
    }

    /// Forget location and cooldown.
    pub fn reset(&mut self) {
        self.last_location = None;
        self.cooldown_until = None;
    }

    fn extend_cooldown(&mut self, until: Instant) {
        self.cooldown_until = Some(match self.cooldown_until {
            Some(current) if current > until => current,
            _ => until,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> EdgeTransitionGuard {
        EdgeTransitionGuard::new(
            GuardConfig::default(),
            vec![Rect::new(0.0, 0.0, 1920.0, 1080.0)],
        )
    }

    fn at(start: Instant, millis: u64, x: f64, y: f64) -> CursorSample {
        CursorSample::at(x, y, start + Duration::from_millis(millis))
    }

    #[test]
    fn test_small_interior_motion_is_not_suppressed() {
        let start = Instant::now();
        let mut guard = guard();
        assert!(!guard.observe(&at(start, 0, 500.0, 500.0)));
        assert!(!guard.observe(&at(start, 16, 550.0, 500.0)));
        assert!(guard.cooldown_until().is_none());
    }

    #[test]
    fn test_jump_opens_cooldown() {
        let start = Instant::now();
        let mut guard = guard();
        guard.observe(&at(start, 0, 500.0, 500.0));
        assert!(guard.observe(&at(start, 10, 801.0, 500.0)));

        // Small moves stay suppressed until the deadline passes.
        assert!(guard.observe(&at(start, 200, 810.0, 500.0)));
        assert!(guard.observe(&at(start, 509, 820.0, 500.0)));
        assert!(!guard.observe(&at(start, 510, 830.0, 500.0)));
    }

    #[test]
    fn test_edge_proximity_triggers() {
        let start = Instant::now();
        let mut guard = guard();
        assert!(guard.observe(&at(start, 0, 1900.0, 500.0)));
        assert!(guard.observe(&at(start, 0, 500.0, 10.0)));
        // Just outside the display still counts as near the edge.
        assert!(guard.observe(&at(start, 0, 1930.0, 500.0)));
    }

    #[test]
    fn test_cooldown_never_moves_backwards() {
        let start = Instant::now();
        let mut guard = guard();
        guard.suppress_from(start + Duration::from_secs(2));
        let later = guard.cooldown_until();
        guard.suppress_from(start);
        assert_eq!(guard.cooldown_until(), later);
    }

    #[test]
    fn test_reset_clears_state() {
        let start = Instant::now();
        let mut guard = guard();
        guard.suppress_from(start);
        guard.reset();
        assert!(!guard.is_suppressing(start));
        // No previous sample, so a far-away first sample is not a jump.
        assert!(!guard.observe(&at(start, 0, 1000.0, 500.0)));
    }

    #[test]
    fn test_config_from_settings() {
        let settings = ShakeSettings {
            jump_threshold_px: 120.0,
            edge_margin_px: 8.0,
            cooldown_ms: 750,
            ..ShakeSettings::default()
        };
        let config = GuardConfig::from(&settings);
        assert_eq!(config.jump_threshold, 120.0);
        assert_eq!(config.edge_margin, 8.0);
        assert_eq!(config.cooldown, Duration::from_millis(750));
    }
}
