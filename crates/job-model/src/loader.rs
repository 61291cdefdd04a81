//! Loading job descriptions from config files.

use std::path::{Path, PathBuf};

use crate::error::JobError;
use crate::format::DocumentFormat;
use crate::job::JobDescription;

/// Read and parse a config file.
///
/// Relative paths resolve against the current working directory. The
/// format is picked from the path's suffix (see [`DocumentFormat::for_path`]).
pub fn load_job(path: impl AsRef<Path>) -> Result<JobDescription, JobError> {
    let path = path.as_ref();
    let absolute = absolute_path(path)?;
    let format = DocumentFormat::for_path(path);

    let contents = std::fs::read_to_string(&absolute).map_err(|e| JobError::Io {
        path: absolute.clone(),
        source: e,
    })?;

    let job = format
        .parser()
        .parse_job(&contents)
        .map_err(|e| JobError::Parse {
            path: absolute.clone(),
            format,
            message: e.message,
        })?;

    tracing::debug!(
        path = %absolute.display(),
        format = %format,
        fields = job.len(),
        "Loaded job description"
    );
    Ok(job)
}

fn absolute_path(path: &Path) -> Result<PathBuf, JobError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| JobError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(cwd.join(path))
}
