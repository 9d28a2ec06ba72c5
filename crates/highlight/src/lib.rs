//! CursorHome Highlight Coordination
//!
//! Owns the lifecycle of the single on-screen highlight:
//! - **Surface:** The narrow seam to whatever draws the highlight
//! - **Session:** One live highlight bound to one display
//! - **Coordinator:** Find, shake, and transition policy, expiry, and
//!   transfer between displays as the pointer crosses a seam
//!
//! At most one session exists at any time. Transfers destroy the old
//! surface before creating the new one, inside a single call.

pub mod coordinator;
pub mod session;
pub mod surface;

pub use coordinator::{
    CoordinatorOutcome, CoordinatorSettings, CoordinatorState, HighlightCoordinator, IgnoreReason,
};
pub use session::HighlightSession;
pub use surface::{RecordingRenderer, RenderCall, SurfaceError, SurfaceFrame, SurfaceHandle, SurfaceRenderer};
