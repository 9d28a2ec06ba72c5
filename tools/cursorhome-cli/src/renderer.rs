//! A renderer that draws nothing and reports what it would draw.

use std::collections::BTreeMap;

use cursorhome_highlight::{SurfaceError, SurfaceFrame, SurfaceHandle, SurfaceRenderer};
use cursorhome_platform_core::{DisplayId, DisplaySnapshot};

/// Logs surface lifecycle at info and frames at trace.
#[derive(Debug, Default)]
pub struct LoggingRenderer {
    next_handle: u64,
    live: BTreeMap<SurfaceHandle, DisplayId>,
    frames: u64,
}

impl LoggingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Frames pushed since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl SurfaceRenderer for LoggingRenderer {
    fn create_surface(&mut self, display: &DisplaySnapshot) -> Result<SurfaceHandle, SurfaceError> {
        self.next_handle += 1;
        let handle = SurfaceHandle(self.next_handle);
        let (id, name) = (display.id, display.name.as_str());
        self.live.insert(handle, id);
        tracing::info!(%handle, display = %id, name, "Surface created");
        Ok(handle)
    }

    fn update(&mut self, handle: SurfaceHandle, frame: &SurfaceFrame) -> Result<(), SurfaceError> {
        if !self.live.contains_key(&handle) {
            return Err(SurfaceError::UnknownHandle(handle));
        }
        self.frames += 1;
        tracing::trace!(
            %handle,
            x = frame.center.x,
            y = frame.center.y,
            phase = frame.phase,
            alpha = frame.alpha,
            "Frame"
        );
        Ok(())
    }

    fn destroy(&mut self, handle: SurfaceHandle) {
        if self.live.remove(&handle).is_some() {
            tracing::info!(%handle, "Surface destroyed");
        }
    }

    fn name(&self) -> &str {
        "logging"
    }
}
