//! CursorHome Common Utilities
//!
//! Shared infrastructure for all CursorHome crates:
//! - Error types and result aliases
//! - Cadence and throttling helpers for the event loop
//! - Tracing/logging initialization
//! - Configuration loading and sanitizing

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
