//! Timestamped pointer samples.

use std::time::Instant;

use crate::geometry::Point;

/// A single pointer position observed at a monotonic instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorSample {
    pub point: Point,
    pub timestamp: Instant,
}

impl CursorSample {
    pub fn new(point: Point, timestamp: Instant) -> Self {
        Self { point, timestamp }
    }

    /// Convenience constructor from raw coordinates.
    pub fn at(x: f64, y: f64, timestamp: Instant) -> Self {
        Self {
            point: Point::new(x, y),
            timestamp,
        }
    }
}
