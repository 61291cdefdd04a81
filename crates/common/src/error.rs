//! Error types shared across Montage crates.

use std::path::PathBuf;

/// Top-level error type for Montage operations.
///
/// Every variant is fatal for the invocation: the binary prints it once and
/// exits with status 1.
#[derive(Debug, thiserror::Error)]
pub enum MontageError {
    /// Bad or missing command-line arguments.
    #[error("{message}")]
    Usage { message: String },

    /// The job configuration file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The job configuration file is not valid for its format.
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// The rendering engine failed or could not be started.
    #[error("Render engine error: {message}")]
    Engine { message: String },

    /// The tool's own configuration is unusable.
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using MontageError.
pub type MontageResult<T> = Result<T, MontageError>;

impl MontageError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage {
            message: msg.into(),
        }
    }

    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error came from argument parsing.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage { .. })
    }
}
