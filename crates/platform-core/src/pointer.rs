//! Global pointer access.

use std::sync::{Arc, Mutex, MutexGuard};

use cursorhome_common::error::{CursorHomeError, CursorHomeResult};
use cursorhome_model::Point;

/// Reads and repositions the system pointer.
pub trait PointerDevice {
    /// Current pointer location in virtual-desktop pixels.
    fn current_pointer_location(&self) -> Point;

    /// Move the system pointer. Platforms that forbid warping (Wayland)
    /// return [`CursorHomeError::Unsupported`].
    fn warp_pointer(&mut self, point: Point) -> CursorHomeResult<()>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

#[derive(Debug)]
struct VirtualPointerState {
    location: Point,
    warps: Vec<Point>,
}

/// An in-memory pointer driven by the caller.
///
/// Clones share state, so a test or simulation can keep one handle to move
/// the pointer while the engine owns another.
#[derive(Debug, Clone)]
pub struct VirtualPointer {
    state: Arc<Mutex<VirtualPointerState>>,
    warp_allowed: bool,
}

impl VirtualPointer {
    pub fn new(location: Point) -> Self {
        Self {
            state: Arc::new(Mutex::new(VirtualPointerState {
                location,
                warps: Vec::new(),
            })),
            warp_allowed: true,
        }
    }

    /// A pointer that refuses to warp, like a Wayland session.
    pub fn without_warp(location: Point) -> Self {
        Self {
            warp_allowed: false,
            ..Self::new(location)
        }
    }

    /// Move the pointer as the user would.
    pub fn move_to(&self, point: Point) {
        self.lock().location = point;
    }

    /// Every successful warp, oldest first.
    pub fn warps(&self) -> Vec<Point> {
        self.lock().warps.clone()
    }

    fn lock(&self) -> MutexGuard<'_, VirtualPointerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PointerDevice for VirtualPointer {
    fn current_pointer_location(&self) -> Point {
        self.lock().location
    }

    fn warp_pointer(&mut self, point: Point) -> CursorHomeResult<()> {
        if !self.warp_allowed {
            return Err(CursorHomeError::unsupported(
                "pointer warping is not permitted by this session",
            ));
        }
        let mut state = self.lock();
        state.location = point;
        state.warps.push(point);
        Ok(())
    }

    fn name(&self) -> &str {
        "virtual"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_location() {
        let pointer = VirtualPointer::new(Point::new(1.0, 2.0));
        let remote = pointer.clone();
        remote.move_to(Point::new(300.0, 400.0));
        assert_eq!(pointer.current_pointer_location(), Point::new(300.0, 400.0));
    }

    #[test]
    fn warp_records_and_moves() {
        let mut pointer = VirtualPointer::new(Point::new(0.0, 0.0));
        pointer.warp_pointer(Point::new(960.0, 540.0)).unwrap();
        assert_eq!(pointer.current_pointer_location(), Point::new(960.0, 540.0));
        assert_eq!(pointer.warps(), vec![Point::new(960.0, 540.0)]);
    }

    #[test]
    fn warp_refused_without_permission() {
        let mut pointer = VirtualPointer::without_warp(Point::new(5.0, 5.0));
        assert!(matches!(
            pointer.warp_pointer(Point::new(960.0, 540.0)),
            Err(CursorHomeError::Unsupported { .. })
        ));
        assert_eq!(pointer.current_pointer_location(), Point::new(5.0, 5.0));
    }
}
