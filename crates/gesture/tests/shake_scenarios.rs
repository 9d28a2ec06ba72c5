//! End-to-end shake detection scenarios over synthetic pointer traces.

use std::time::{Duration, Instant};

use cursorhome_common::config::ShakeSettings;
use cursorhome_gesture::{
    DetectorState, HeuristicShakeSource, ShakeConfig, ShakeGestureDetector, ShakeSource,
};
use cursorhome_model::{CursorSample, Rect};
use proptest::prelude::*;

fn screen() -> Vec<Rect> {
    vec![Rect::new(0.0, 0.0, 1920.0, 1080.0)]
}

fn detector() -> ShakeGestureDetector {
    ShakeGestureDetector::new(ShakeConfig::default(), screen())
}

/// Alternating horizontal motion: `count` samples, `amplitude` px apart,
/// one every `step_ms`, beginning at `offset_ms`.
fn alternating(
    start: Instant,
    offset_ms: u64,
    x: f64,
    amplitude: f64,
    count: usize,
    step_ms: u64,
) -> Vec<CursorSample> {
    (0..count)
        .map(|i| {
            let px = if i % 2 == 0 { x } else { x + amplitude };
            let ts = start + Duration::from_millis(offset_ms + i as u64 * step_ms);
            CursorSample::at(px, 540.0, ts)
        })
        .collect()
}

fn feed(detector: &mut ShakeGestureDetector, samples: &[CursorSample]) -> Vec<usize> {
    samples
        .iter()
        .enumerate()
        .filter_map(|(i, s)| detector.on_sample(*s).map(|_| i))
        .collect()
}

#[test]
fn fast_interior_shake_fires_once() {
    let start = Instant::now();
    let mut detector = detector();

    // 1000 px/s with four reversals: fires on the sixth sample.
    let fired = feed(&mut detector, &alternating(start, 0, 500.0, 50.0, 6, 50));
    assert_eq!(fired, vec![5]);
    assert_eq!(detector.state(), DetectorState::Idle);
}

#[test]
fn history_is_cleared_after_fire() {
    let start = Instant::now();
    let mut detector = detector();

    let fired = feed(&mut detector, &alternating(start, 0, 500.0, 50.0, 11, 50));
    // Second fire needs a full fresh run of samples after the first.
    assert_eq!(fired, vec![5]);
}

#[test]
fn five_samples_are_not_enough_reversals() {
    let start = Instant::now();
    let mut detector = detector();
    let fired = feed(&mut detector, &alternating(start, 0, 500.0, 50.0, 5, 50));
    assert!(fired.is_empty());
    assert_eq!(detector.state(), DetectorState::Accumulating);
}

#[test]
fn jump_suppresses_then_allows() {
    let start = Instant::now();
    let mut detector = detector();

    assert!(detector.on_sample(CursorSample::at(200.0, 540.0, start)).is_none());
    // 300 px teleport opens a 500 ms cooldown.
    assert!(detector.on_sample(CursorSample::at(500.0, 540.0, start)).is_none());
    assert_eq!(detector.state(), DetectorState::Suppressed);

    let fired = feed(&mut detector, &alternating(start, 50, 500.0, 50.0, 6, 50));
    assert!(fired.is_empty(), "shake inside cooldown must not fire");

    let fired = feed(&mut detector, &alternating(start, 600, 500.0, 50.0, 6, 50));
    assert_eq!(fired, vec![5]);
}

#[test]
fn shake_hugging_an_edge_is_ignored() {
    let start = Instant::now();
    let mut detector = detector();
    let fired = feed(&mut detector, &alternating(start, 0, 1875.0, 30.0, 12, 50));
    assert!(fired.is_empty());
}

#[test]
fn sensitivity_moves_the_threshold() {
    let start = Instant::now();
    // 400 px/s: below the 600 px/s default, above the 300 px/s maximum.
    let slow = alternating(start, 0, 500.0, 20.0, 6, 50);

    let mut default = detector();
    assert!(feed(&mut default, &slow).is_empty());

    let mut eager = detector();
    eager.set_sensitivity(1.0);
    assert_eq!(feed(&mut eager, &slow), vec![5]);
}

#[test]
fn heuristic_source_reads_settings() {
    let start = Instant::now();
    let settings = ShakeSettings {
        sensitivity: 1.0,
        ..ShakeSettings::default()
    };
    let mut source = HeuristicShakeSource::new(&settings, screen());
    let events: Vec<_> = alternating(start, 0, 500.0, 20.0, 6, 50)
        .into_iter()
        .filter_map(|s| source.on_sample(s))
        .collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].origin.x, 520.0);
}

#[test]
fn engine_warp_suppresses_detection() {
    let start = Instant::now();
    let mut detector = detector();
    detector.suppress_from(start);
    let fired = feed(&mut detector, &alternating(start, 10, 500.0, 50.0, 6, 50));
    assert!(fired.is_empty());
}

proptest! {
    #[test]
    fn monotone_sweep_never_fires(
        steps in prop::collection::vec((0.0f64..150.0, 1u64..50), 4..80),
        start_x in 100.0f64..400.0,
    ) {
        let start = Instant::now();
        let mut detector = detector();
        let mut x = start_x;
        let mut t = 0u64;
        for (dx, dt) in steps {
            x += dx;
            t += dt;
            let sample = CursorSample::at(x, 540.0, start + Duration::from_millis(t));
            prop_assert!(detector.on_sample(sample).is_none());
        }
    }
}
