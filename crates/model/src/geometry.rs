//! Point and rectangle types in virtual-desktop pixel space.
//!
//! The virtual desktop spans every connected display. Its origin is the
//! top-left of the primary display, so coordinates may be negative for
//! displays arranged to the left of or above the primary.

use serde::{Deserialize, Serialize};

/// A point in virtual-desktop pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in virtual-desktop pixels.
///
/// The rectangle is half-open: it contains its left and top edges but not
/// its right and bottom edges, so adjacent displays never both claim a
/// point on their shared seam.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// The center point of this rectangle.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if a point lies within this rectangle.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Grow (positive) or shrink (negative) the rectangle on every side.
    ///
    /// Shrinking past zero collapses to an empty rectangle at the center.
    pub fn inset(&self, amount: f64) -> Rect {
        let width = (self.width - 2.0 * amount).max(0.0);
        let height = (self.height - 2.0 * amount).max(0.0);
        let center = self.center();
        Rect::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    /// Whether `point` lies within `margin` pixels of any edge, on either
    /// side of it.
    pub fn near_edge(&self, point: Point, margin: f64) -> bool {
        if margin <= 0.0 {
            return false;
        }
        self.inset(-margin).contains(point) && !self.inset(margin).contains(point)
    }

    /// Smallest rectangle covering both inputs.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open() {
        let r = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(r.contains(Point::new(1919.5, 1079.5)));
        assert!(!r.contains(Point::new(1920.0, 500.0)));
        assert!(!r.contains(Point::new(500.0, 1080.0)));
    }

    #[test]
    fn test_center() {
        let r = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        assert_eq!(r.center(), Point::new(960.0, 540.0));
    }

    #[test]
    fn test_near_edge_inside_and_outside() {
        let r = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        assert!(r.near_edge(Point::new(10.0, 500.0), 50.0));
        assert!(r.near_edge(Point::new(1900.0, 500.0), 50.0));
        assert!(r.near_edge(Point::new(-20.0, 500.0), 50.0));
        assert!(!r.near_edge(Point::new(960.0, 540.0), 50.0));
        assert!(!r.near_edge(Point::new(-200.0, 500.0), 50.0));
        assert!(!r.near_edge(Point::new(10.0, 500.0), 0.0));
    }

    #[test]
    fn test_inset_collapses() {
        let r = Rect::new(0.0, 0.0, 40.0, 40.0);
        let shrunk = r.inset(50.0);
        assert_eq!(shrunk.area(), 0.0);
        assert_eq!(shrunk.center(), r.center());
    }

    #[test]
    fn test_union_covers_negative_origin() {
        let left = Rect::new(-1920.0, 0.0, 1920.0, 1080.0);
        let main = Rect::new(0.0, 0.0, 2560.0, 1440.0);
        let all = left.union(&main);
        assert_eq!(all, Rect::new(-1920.0, 0.0, 4480.0, 1440.0));
    }

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-9);
    }
}
