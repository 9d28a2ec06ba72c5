//! CursorHome platform core contracts.
//!
//! This crate contains the display topology snapshot and the narrow traits
//! through which the engine talks to the OS: reading and warping the
//! pointer, and enumerating displays. Concrete OS backends live outside
//! the engine and only have to implement these traits.

pub mod display;
pub mod pointer;

pub use display::*;
pub use pointer::*;
