//! The drawing-surface seam.
//!
//! The engine never draws. It asks a [`SurfaceRenderer`] for one overlay
//! per display and pushes frames into it.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use cursorhome_model::{CursorStyle, Point};
use cursorhome_platform_core::{DisplayId, DisplaySnapshot};
use thiserror::Error;

/// Opaque handle to an overlay surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceHandle(pub u64);

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface-{}", self.0)
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceFrame {
    /// Highlight center in virtual-desktop pixels.
    pub center: Point,
    pub style: CursorStyle,
    /// Animation progress in `[0, 1]`.
    pub phase: f64,
    /// Opacity multiplier derived from the phase.
    pub alpha: f64,
    /// Size multiplier derived from the phase.
    pub scale: f64,
}

/// Renderer failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("display {0} is not available")]
    DisplayUnavailable(DisplayId),

    #[error("unknown surface {0}")]
    UnknownHandle(SurfaceHandle),
}

/// Creates, updates, and destroys per-display overlay surfaces.
pub trait SurfaceRenderer {
    fn create_surface(&mut self, display: &DisplaySnapshot) -> Result<SurfaceHandle, SurfaceError>;

    fn update(&mut self, handle: SurfaceHandle, frame: &SurfaceFrame) -> Result<(), SurfaceError>;

    /// Destroying an unknown handle is a no-op.
    fn destroy(&mut self, handle: SurfaceHandle);

    /// Renderer name for logging.
    fn name(&self) -> &str;
}

/// One call received by a [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Create {
        handle: SurfaceHandle,
        display: DisplayId,
    },
    Update {
        handle: SurfaceHandle,
        frame: SurfaceFrame,
    },
    Destroy {
        handle: SurfaceHandle,
    },
}

/// In-memory renderer that records every call.
///
/// Used by tests and dry runs. Tracks the peak number of live surfaces so
/// callers can check that two highlights never coexisted.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    live: BTreeMap<SurfaceHandle, DisplayId>,
    calls: Vec<RenderCall>,
    failing: BTreeSet<DisplayId>,
    next_handle: u64,
    peak_live: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create_surface` fail for `display`.
    pub fn fail_on(&mut self, display: DisplayId) {
        self.failing.insert(display);
    }

    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Live surfaces and the displays they sit on.
    pub fn live(&self) -> Vec<(SurfaceHandle, DisplayId)> {
        self.live.iter().map(|(h, d)| (*h, *d)).collect()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Most surfaces ever alive at once.
    pub fn peak_live(&self) -> usize {
        self.peak_live
    }

    /// Most recent frame pushed to `handle`.
    pub fn last_frame(&self, handle: SurfaceHandle) -> Option<&SurfaceFrame> {
        self.calls.iter().rev().find_map(|call| match call {
            RenderCall::Update { handle: h, frame } if *h == handle => Some(frame),
            _ => None,
        })
    }
}

impl SurfaceRenderer for RecordingRenderer {
    fn create_surface(&mut self, display: &DisplaySnapshot) -> Result<SurfaceHandle, SurfaceError> {
        if self.failing.contains(&display.id) {
            return Err(SurfaceError::DisplayUnavailable(display.id));
        }
        self.next_handle += 1;
        let handle = SurfaceHandle(self.next_handle);
        self.live.insert(handle, display.id);
        self.peak_live = self.peak_live.max(self.live.len());
        self.calls.push(RenderCall::Create {
            handle,
            display: display.id,
        });
        Ok(handle)
    }

    fn update(&mut self, handle: SurfaceHandle, frame: &SurfaceFrame) -> Result<(), SurfaceError> {
        if !self.live.contains_key(&handle) {
            return Err(SurfaceError::UnknownHandle(handle));
        }
        self.calls.push(RenderCall::Update {
            handle,
            frame: frame.clone(),
        });
        Ok(())
    }

    fn destroy(&mut self, handle: SurfaceHandle) {
        if self.live.remove(&handle).is_some() {
            self.calls.push(RenderCall::Destroy { handle });
        }
    }

    fn name(&self) -> &str {
        "recording"
    }
}
