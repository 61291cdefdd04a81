//! The rendering engine contract.

use std::future::Future;

use montage_common::error::MontageResult;
use montage_job::JobDescription;

/// Something that can render a job description.
///
/// `render` resolves once the whole job is done, or fails with an
/// engine error. There is no progress stream and no partial result.
pub trait RenderEngine {
    /// Engine name for logs and notices.
    fn name(&self) -> &str;

    /// Render the job to completion.
    fn render(&mut self, job: JobDescription) -> impl Future<Output = MontageResult<()>> + Send;
}
