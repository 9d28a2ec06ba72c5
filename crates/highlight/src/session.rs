//! A single live highlight.

use std::time::{Duration, Instant};

use cursorhome_model::{AnimationSpec, CursorStyle, Point};
use cursorhome_platform_core::DisplayId;

use crate::surface::{SurfaceFrame, SurfaceHandle};

/// One highlight bound to exactly one display.
///
/// Style and animation are fixed at creation; settings changes only affect
/// the next session.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightSession {
    pub display: DisplayId,
    pub surface: SurfaceHandle,
    pub center: Point,
    pub style: CursorStyle,
    pub animation: AnimationSpec,
    /// Start of the current animation run.
    pub started_at: Instant,
    pub expires_at: Instant,
    /// Set when the pointer could not be warped to the center; the session
    /// then stays at its center instead of following the pointer.
    pub pinned: bool,
}

impl HighlightSession {
    /// Whether the session should be torn down at `now`.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }

    /// Restart the expiry timer and the animation.
    pub fn restart(&mut self, now: Instant, duration: Duration) {
        self.started_at = now;
        self.expires_at = now + duration;
    }

    /// Frame for the renderer at `now`.
    pub fn frame(&self, now: Instant) -> SurfaceFrame {
        let elapsed = now.saturating_duration_since(self.started_at).as_secs_f64();
        let phase = self.animation.phase(elapsed);
        let (alpha, scale) = self.animation.modulation(phase);
        SurfaceFrame {
            center: self.center,
            style: self.style.clone(),
            phase,
            alpha,
            scale,
        }
    }
}
