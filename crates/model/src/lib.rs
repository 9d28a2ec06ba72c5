//! CursorHome Model
//!
//! Defines the core data contracts shared by every CursorHome crate:
//! - **Geometry:** Points and rectangles in virtual-desktop pixels
//! - **Samples:** Timestamped pointer positions fed to gesture detection
//! - **Transitions:** Cursor hand-offs to and from a remote machine
//! - **Style:** Highlight shape, color, and animation descriptors
//!
//! All coordinates are absolute virtual-desktop pixels. Timestamps are
//! monotonic [`std::time::Instant`] values and are never serialized.

pub mod geometry;
pub mod sample;
pub mod style;
pub mod transition;

pub use geometry::*;
pub use sample::*;
pub use style::*;
pub use transition::*;
