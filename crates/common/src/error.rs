//! Error types shared across CursorHome crates.
//!
//! None of these are fatal to the engine: callers log them and degrade
//! (no highlight, polling instead of watching, heuristic instead of native).

/// Top-level error type for CursorHome operations.
#[derive(Debug, thiserror::Error)]
pub enum CursorHomeError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The platform cannot do this at all (e.g. pointer warping on Wayland).
    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error("Remote log error: {message}")]
    RemoteLog { message: String },

    #[error("Engine loop is not running")]
    EngineStopped,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using CursorHomeError.
pub type CursorHomeResult<T> = Result<T, CursorHomeError>;

impl CursorHomeError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    pub fn remote_log(msg: impl Into<String>) -> Self {
        Self::RemoteLog {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            CursorHomeError::unsupported("no warp").to_string(),
            "Unsupported operation: no warp"
        );
        assert_eq!(
            CursorHomeError::EngineStopped.to_string(),
            "Engine loop is not running"
        );
    }

    #[test]
    fn test_io_converts() {
        let err: CursorHomeError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, CursorHomeError::Io(_)));
    }
}
