//! CursorHome Gesture Detection
//!
//! Turns a stream of raw pointer samples into discrete "shake" events:
//! - **Sample Buffer:** Sliding time window of recent samples
//! - **Edge Guard:** Suppression after warps and seam crossings
//! - **Shake Detector:** Direction-reversal and velocity analysis
//! - **Shake Sources:** Heuristic or native-signal strategies behind one trait
//!
//! This crate is pure computation. Every call takes the sample's own
//! timestamp as "now"; nothing here reads the clock.

pub mod buffer;
pub mod guard;
pub mod shake;
pub mod source;

pub use buffer::MotionSampleBuffer;
pub use guard::{EdgeTransitionGuard, GuardConfig};
pub use shake::{window_stats, DetectorState, ShakeConfig, ShakeEvent, ShakeGestureDetector, WindowStats};
pub use source::{
    build_shake_source, HeuristicShakeSource, ManualShakeSignal, NativeShakeSignal,
    NativeShakeSource, ShakeSource, SharedShakeSignal,
};
