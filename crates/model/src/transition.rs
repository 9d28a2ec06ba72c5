//! Cursor hand-off events between this machine and a remote one.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Name used when a transition line does not mention the remote screen.
pub const UNKNOWN_REMOTE: &str = "remote";

/// Direction of a cursor hand-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// The cursor left this machine for a remote screen.
    Left,
    /// The cursor came back to this machine.
    Returned,
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionKind::Left => f.write_str("left"),
            TransitionKind::Returned => f.write_str("returned"),
        }
    }
}

/// A cursor transition parsed from one line of the sharing tool's log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorTransition {
    pub kind: TransitionKind,
    /// Screen name of the remote machine involved.
    pub remote_name: String,
    /// When the line was observed.
    pub timestamp: Instant,
}

impl CursorTransition {
    pub fn left(remote_name: impl Into<String>, timestamp: Instant) -> Self {
        Self {
            kind: TransitionKind::Left,
            remote_name: remote_name.into(),
            timestamp,
        }
    }

    pub fn returned(remote_name: impl Into<String>, timestamp: Instant) -> Self {
        Self {
            kind: TransitionKind::Returned,
            remote_name: remote_name.into(),
            timestamp,
        }
    }
}
