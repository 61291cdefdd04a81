//! Job submission.

use std::io::Write;

use montage_common::error::MontageResult;
use montage_job::JobDescription;

use crate::engine::RenderEngine;

/// Prefix of every user-facing notice.
pub const NOTICE_PREFIX: &str = "[montage]";

/// Hand `job` to `engine` once and wait for it to finish.
///
/// Writes a notice naming the render target before submission and another
/// after success. Engine failures are returned as-is; nothing is retried.
pub async fn submit<E, W>(engine: &mut E, job: JobDescription, notices: &mut W) -> MontageResult<()>
where
    E: RenderEngine,
    W: Write + ?Sized,
{
    let target = job.target_label();
    writeln!(notices, "{NOTICE_PREFIX} rendering with config: {target}").ok();
    tracing::info!(
        engine = engine.name(),
        target = %target,
        fields = job.len(),
        "Submitting render job"
    );

    let result = engine.render(job).await;
    if let Err(err) = result {
        tracing::error!(engine = engine.name(), target = %target, error = %err, "Render failed");
        return Err(err);
    }

    writeln!(notices, "{NOTICE_PREFIX} render finished").ok();
    Ok(())
}
