//! Errors raised while loading a job description.

use std::path::PathBuf;

use montage_common::error::MontageError;

use crate::format::DocumentFormat;

/// Errors that can occur when loading a config file.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path} ({format}): {message}")]
    Parse {
        path: PathBuf,
        format: DocumentFormat,
        message: String,
    },
}

impl From<JobError> for MontageError {
    fn from(err: JobError) -> Self {
        match err {
            JobError::Io { path, source } => MontageError::Io { path, source },
            JobError::Parse {
                path,
                format,
                message,
            } => MontageError::Parse {
                path,
                message: format!("invalid {format}: {message}"),
            },
        }
    }
}
