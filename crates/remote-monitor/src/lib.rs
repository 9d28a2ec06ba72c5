//! CursorHome Remote Monitor
//!
//! Detects when the cursor leaves for, or comes back from, another machine
//! by following the log of a mouse-sharing tool such as Synergy:
//!
//! - **Paths:** Well-known log locations plus user-configured ones
//! - **Tailer:** Incremental reads of appended lines, surviving rotation
//! - **Parser:** Free-text log lines to typed transitions
//! - **Watcher:** File-system notifications marshaled onto the event loop
//!
//! The tailer is poll-driven. The watcher only says "look now"; all reads
//! happen on the caller's task.

pub mod parser;
pub mod paths;
pub mod tailer;
pub mod watcher;

pub use parser::{parse, parse_at, parse_batch};
pub use paths::{candidate_paths, default_candidate_paths};
pub use tailer::{LogTailer, TailerState};
pub use watcher::LogWatcher;
