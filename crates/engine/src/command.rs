//! Control messages for the engine loop.

use std::time::Instant;

use cursorhome_common::config::AppConfig;
use cursorhome_common::error::{CursorHomeError, CursorHomeResult};
use cursorhome_model::{CursorSample, Point};
use cursorhome_platform_core::DisplayTopology;
use tokio::sync::mpsc;

/// Inputs delivered to the engine from outside the loop.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// "Find my cursor" (hotkey, tray menu).
    FindCursor,
    /// Tear down any visible highlight.
    HideAll,
    /// Replace the live configuration.
    ApplySettings(Box<AppConfig>),
    /// The display layout changed.
    DisplaysChanged(DisplayTopology),
    /// A pushed pointer-motion event from the platform.
    PointerMoved(CursorSample),
    /// Hide everything, stop the tailer, and leave the loop.
    Shutdown,
}

/// Cloneable sender for [`EngineCommand`]s.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<EngineCommand>,
}

impl EngineHandle {
    /// Create a handle and the receiver to pass to [`crate::Engine::run`].
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<EngineCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn send(&self, command: EngineCommand) -> CursorHomeResult<()> {
        self.tx.send(command).map_err(|_| CursorHomeError::EngineStopped)
    }

    pub fn find_cursor(&self) -> CursorHomeResult<()> {
        self.send(EngineCommand::FindCursor)
    }

    pub fn hide_all(&self) -> CursorHomeResult<()> {
        self.send(EngineCommand::HideAll)
    }

    pub fn apply_settings(&self, config: AppConfig) -> CursorHomeResult<()> {
        self.send(EngineCommand::ApplySettings(Box::new(config)))
    }

    pub fn displays_changed(&self, topology: DisplayTopology) -> CursorHomeResult<()> {
        self.send(EngineCommand::DisplaysChanged(topology))
    }

    /// Report pointer motion observed now.
    pub fn pointer_moved(&self, point: Point) -> CursorHomeResult<()> {
        self.send(EngineCommand::PointerMoved(CursorSample::new(point, Instant::now())))
    }

    pub fn shutdown(&self) -> CursorHomeResult<()> {
        self.send(EngineCommand::Shutdown)
    }

    /// Whether the engine loop has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
