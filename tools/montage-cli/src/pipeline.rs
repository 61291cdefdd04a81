//! Resolve a job from the command line and hand it to a render engine.

use std::io::Write;

use montage_common::error::MontageResult;
use montage_job::{apply_overrides, load_job, JobDescription};
use montage_render_engine::{submit, RenderEngine};

use crate::args::CliOptions;

/// Load the config file and layer the CLI overrides on top.
pub fn resolve_job(options: &CliOptions) -> MontageResult<JobDescription> {
    let loaded = load_job(&options.config_path)?;
    Ok(apply_overrides(loaded, &options.overrides()))
}

/// Run the whole pipeline: load, merge, then either print the job
/// (`--dry-run`) or submit it to the engine built by `make_engine`.
///
/// The engine is only built once the job resolved, so a bad config never
/// touches the renderer.
pub async fn run<E, F, W>(options: &CliOptions, make_engine: F, out: &mut W) -> MontageResult<()>
where
    E: RenderEngine,
    F: FnOnce() -> MontageResult<E>,
    W: Write + ?Sized,
{
    let job = resolve_job(options)?;
    tracing::debug!(
        config = %options.config_path.display(),
        target = %job.target_label(),
        "Resolved job"
    );

    if options.dry_run {
        writeln!(out, "{}", job.to_pretty_json()?).ok();
        return Ok(());
    }

    let mut engine = make_engine()?;
    submit(&mut engine, job, out).await
}
