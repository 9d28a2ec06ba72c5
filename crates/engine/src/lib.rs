//! CursorHome Engine
//!
//! Wires gesture detection, remote log following, and highlight
//! coordination into one cooperative loop. Every input is handled to
//! completion before the next one is looked at, so no component needs
//! locking.
//!
//! The loop itself ([`Engine::run`]) is a thin `tokio::select!` over the
//! synchronous [`Engine::handle`], [`Engine::tick`], and
//! [`Engine::poll_remote`] entry points, which tests drive directly with
//! synthetic timestamps.

pub mod command;
pub mod engine;

pub use command::{EngineCommand, EngineHandle};
pub use engine::Engine;
