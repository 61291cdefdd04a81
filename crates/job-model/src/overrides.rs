//! Command-line overrides layered over a loaded job description.

use serde_json::Number;

use crate::job::{JobDescription, FAST_KEY, HEIGHT_KEY, OUT_PATH_KEY, WIDTH_KEY};

/// Values supplied on the command line that take precedence over the file.
///
/// `None`/`false` means "not supplied": the file's value, or its absence,
/// is kept. No defaults are ever injected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobOverrides {
    /// Replaces `outPath`.
    pub output: Option<String>,

    /// Replaces `width`. Any number, not range-checked.
    pub width: Option<Number>,

    /// Replaces `height`. Any number, not range-checked.
    pub height: Option<Number>,

    /// Forces `fast: true`.
    pub fast: bool,
}

/// Apply `overrides` on top of `job` and return the merged job.
pub fn apply_overrides(mut job: JobDescription, overrides: &JobOverrides) -> JobDescription {
    if let Some(output) = &overrides.output {
        tracing::debug!(output = %output, "Overriding output path");
        job.set(OUT_PATH_KEY, output.as_str());
    }

    if overrides.width.is_some() || overrides.height.is_some() {
        if let Some(width) = &overrides.width {
            job.set(WIDTH_KEY, width.clone());
        }
        if let Some(height) = &overrides.height {
            job.set(HEIGHT_KEY, height.clone());
        }
        tracing::debug!(
            width = ?overrides.width,
            height = ?overrides.height,
            "Overriding output dimensions"
        );
    }

    if overrides.fast {
        tracing::debug!("Forcing fast mode");
        job.set(FAST_KEY, true);
    }

    job
}
