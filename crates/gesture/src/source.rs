//! Interchangeable shake detection strategies.
//!
//! Some desktops expose a native "pointer is being shaken" flag. Where one
//! exists it can replace the heuristic, but it still goes through the same
//! edge transition guard so seam crossings never read as a shake.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use cursorhome_common::config::{ShakeSettings, ShakeStrategy};
use cursorhome_model::{CursorSample, Rect};

use crate::guard::{EdgeTransitionGuard, GuardConfig};
use crate::shake::{ShakeConfig, ShakeEvent, ShakeGestureDetector};

/// Anything that turns pointer samples into shake events.
pub trait ShakeSource: Send {
    /// Feed one sample; returns an event when a shake completes.
    fn on_sample(&mut self, sample: CursorSample) -> Option<ShakeEvent>;

    /// Suppress detection from `now` for one cooldown.
    fn suppress_from(&mut self, now: Instant);

    /// Display rectangles used for edge suppression.
    fn set_display_bounds(&mut self, bounds: Vec<Rect>);

    /// Apply updated settings.
    fn reconfigure(&mut self, settings: &ShakeSettings);

    /// Strategy name for logging.
    fn name(&self) -> &str;
}

/// Native platform flag that is `true` while the user shakes the pointer.
///
/// Shared so the strategy can be rebuilt around the same signal when the
/// settings change.
pub trait NativeShakeSignal: Send + Sync {
    fn is_shaking(&self) -> bool;
}

/// A native signal handle the engine can hand out more than once.
pub type SharedShakeSignal = Arc<dyn NativeShakeSignal>;

/// Direction-reversal heuristic over the raw sample stream.
#[derive(Debug, Clone)]
pub struct HeuristicShakeSource {
    detector: ShakeGestureDetector,
}

impl HeuristicShakeSource {
    pub fn new(settings: &ShakeSettings, display_bounds: Vec<Rect>) -> Self {
        Self {
            detector: ShakeGestureDetector::from_settings(settings, display_bounds),
        }
    }

    pub fn detector(&self) -> &ShakeGestureDetector {
        &self.detector
    }
}

impl ShakeSource for HeuristicShakeSource {
    fn on_sample(&mut self, sample: CursorSample) -> Option<ShakeEvent> {
        self.detector.on_sample(sample)
    }

    fn suppress_from(&mut self, now: Instant) {
        self.detector.suppress_from(now);
    }

    fn set_display_bounds(&mut self, bounds: Vec<Rect>) {
        self.detector.set_display_bounds(bounds);
    }

    fn reconfigure(&mut self, settings: &ShakeSettings) {
        self.detector.reconfigure(ShakeConfig::from(settings));
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

/// Fires once per rising edge of a native shake signal.
///
/// A rising edge observed while the guard suppresses is consumed, not
/// deferred: the signal has to drop and rise again to fire.
pub struct NativeShakeSource<S> {
    signal: S,
    guard: EdgeTransitionGuard,
    was_shaking: bool,
}

impl<S: NativeShakeSignal> NativeShakeSource<S> {
    pub fn new(signal: S, settings: &ShakeSettings, display_bounds: Vec<Rect>) -> Self {
        Self {
            signal,
            guard: EdgeTransitionGuard::new(GuardConfig::from(settings), display_bounds),
            was_shaking: false,
        }
    }
}

impl<S: NativeShakeSignal> ShakeSource for NativeShakeSource<S> {
    fn on_sample(&mut self, sample: CursorSample) -> Option<ShakeEvent> {
        let suppressed = self.guard.observe(&sample);
        let shaking = self.signal.is_shaking();
        let rising = shaking && !self.was_shaking;
        self.was_shaking = shaking;

        if !rising {
            return None;
        }
        if suppressed {
            tracing::debug!("Native shake edge ignored during suppression");
            return None;
        }

        tracing::debug!(x = sample.point.x, y = sample.point.y, "Native shake detected");
        Some(ShakeEvent {
            at: sample.timestamp,
            origin: sample.point,
        })
    }

    fn suppress_from(&mut self, now: Instant) {
        self.guard.suppress_from(now);
    }

    fn set_display_bounds(&mut self, bounds: Vec<Rect>) {
        self.guard.set_display_bounds(bounds);
    }

    fn reconfigure(&mut self, settings: &ShakeSettings) {
        self.guard.set_config(GuardConfig::from(settings));
    }

    fn name(&self) -> &str {
        "native"
    }
}

impl NativeShakeSignal for SharedShakeSignal {
    fn is_shaking(&self) -> bool {
        (**self).is_shaking()
    }
}

/// A native signal toggled by hand. Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct ManualShakeSignal {
    shaking: Arc<AtomicBool>,
}

impl ManualShakeSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, shaking: bool) {
        self.shaking.store(shaking, Ordering::SeqCst);
    }
}

impl NativeShakeSignal for ManualShakeSignal {
    fn is_shaking(&self) -> bool {
        self.shaking.load(Ordering::SeqCst)
    }
}

/// Build the configured strategy.
///
/// `Native` without a platform signal falls back to the heuristic.
pub fn build_shake_source(
    settings: &ShakeSettings,
    display_bounds: Vec<Rect>,
    native: Option<SharedShakeSignal>,
) -> Box<dyn ShakeSource> {
    match (settings.strategy, native) {
        (ShakeStrategy::Native, Some(signal)) => {
            Box::new(NativeShakeSource::new(signal, settings, display_bounds))
        }
        (ShakeStrategy::Native, None) => {
            tracing::warn!("Native shake signal unavailable, using heuristic detection");
            Box::new(HeuristicShakeSource::new(settings, display_bounds))
        }
        (ShakeStrategy::Heuristic, _) => {
            Box::new(HeuristicShakeSource::new(settings, display_bounds))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn bounds() -> Vec<Rect> {
        vec![Rect::new(0.0, 0.0, 1920.0, 1080.0)]
    }

    fn at(start: Instant, millis: u64, x: f64) -> CursorSample {
        CursorSample::at(x, 500.0, start + Duration::from_millis(millis))
    }

    #[test]
    fn test_native_fires_once_per_rising_edge() {
        let start = Instant::now();
        let signal = ManualShakeSignal::new();
        let mut source = NativeShakeSource::new(signal.clone(), &ShakeSettings::default(), bounds());

        assert!(source.on_sample(at(start, 0, 500.0)).is_none());
        signal.set(true);
        assert!(source.on_sample(at(start, 16, 510.0)).is_some());
        assert!(source.on_sample(at(start, 32, 520.0)).is_none());
        signal.set(false);
        assert!(source.on_sample(at(start, 48, 530.0)).is_none());
        signal.set(true);
        assert!(source.on_sample(at(start, 64, 540.0)).is_some());
    }

    #[test]
    fn test_native_edge_during_suppression_is_consumed() {
        let start = Instant::now();
        let signal = ManualShakeSignal::new();
        let mut source = NativeShakeSource::new(signal.clone(), &ShakeSettings::default(), bounds());

        source.on_sample(at(start, 0, 500.0));
        signal.set(true);
        // 400 px jump: suppressed, edge consumed.
        assert!(source.on_sample(at(start, 16, 900.0)).is_none());
        // Still high after the cooldown: no new edge.
        assert!(source.on_sample(at(start, 700, 910.0)).is_none());
    }

    #[test]
    fn test_factory_falls_back_without_native_signal() {
        let settings = ShakeSettings {
            strategy: ShakeStrategy::Native,
            ..ShakeSettings::default()
        };
        assert_eq!(build_shake_source(&settings, bounds(), None).name(), "heuristic");

        let native: SharedShakeSignal = Arc::new(ManualShakeSignal::new());
        assert_eq!(
            build_shake_source(&settings, bounds(), Some(native.clone())).name(),
            "native"
        );

        let heuristic = ShakeSettings {
            strategy: ShakeStrategy::Heuristic,
            ..settings
        };
        assert_eq!(build_shake_source(&heuristic, bounds(), Some(native)).name(), "heuristic");
    }
}
