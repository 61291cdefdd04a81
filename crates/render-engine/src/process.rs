//! External renderer process.
//!
//! The job is written to a temporary JSON file and handed to the renderer
//! as `<program> [args..] --json <file>`, the editly command-line contract.
//! The renderer's stdout is inherited so its own progress output reaches
//! the user; stderr is captured and its tail reported on failure.

use std::collections::VecDeque;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use montage_common::config::{RendererConfig, RENDERER_ENV};
use montage_common::error::{MontageError, MontageResult};
use montage_job::JobDescription;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{ChildStderr, Command};

use crate::engine::RenderEngine;

/// Flag that precedes the job file path on the renderer command line.
pub const JOB_FILE_FLAG: &str = "--json";

const STDERR_TAIL_LINES: usize = 20;

/// Renders by running an external program once per job.
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    program: PathBuf,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl ProcessEngine {
    /// Engine running `program` as given (no `PATH` resolution).
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    /// Extra arguments placed before `--json <file>`.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Build an engine from tool configuration.
    ///
    /// The program is the first of `--renderer`, `MONTAGE_RENDERER`, and
    /// the configured program that can be found. `working_dir` wins over
    /// the configured working directory.
    pub fn from_config(
        config: &RendererConfig,
        explicit_program: Option<&str>,
        working_dir: Option<PathBuf>,
    ) -> MontageResult<Self> {
        let candidates = config.program_candidates(explicit_program);
        let program = resolve_program(&candidates)?;

        let mut engine = Self::new(program).with_args(config.args.iter().cloned());
        if let Some(dir) = working_dir.or_else(|| config.working_dir.clone()) {
            engine = engine.with_working_dir(dir);
        }
        Ok(engine)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    fn command_args(&self, job_file: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.args.iter().map(OsString::from).collect();
        args.push(JOB_FILE_FLAG.into());
        args.push(job_file.as_os_str().to_owned());
        args
    }
}

impl RenderEngine for ProcessEngine {
    fn name(&self) -> &str {
        self.program
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("renderer")
    }

    async fn render(&mut self, job: JobDescription) -> MontageResult<()> {
        if let Some(dir) = &self.working_dir {
            if !dir.is_dir() {
                return Err(MontageError::engine(format!(
                    "Renderer working directory does not exist: {}",
                    dir.display()
                )));
            }
        }

        // Kept alive until the renderer exits; removed on drop.
        let job_file = write_job_file(&job)?;
        let args = self.command_args(job_file.path());
        tracing::debug!(program = %self.program.display(), args = ?args, "Running renderer");

        let mut cmd = Command::new(&self.program);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let started = std::time::Instant::now();
        let mut child = cmd.spawn().map_err(|e| {
            MontageError::engine(format!("Failed to start {}: {e}", self.program.display()))
        })?;
        tracing::info!(
            pid = ?child.id(),
            program = %self.program.display(),
            "Renderer process started"
        );

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| MontageError::engine("Failed to capture renderer stderr"))?;
        let stderr_task = tokio::spawn(drain_stderr(stderr));

        let status = child.wait().await.map_err(|e| {
            MontageError::engine(format!("Failed to wait on {}: {e}", self.program.display()))
        })?;
        let stderr_tail = stderr_task
            .await
            .unwrap_or_else(|_| "<failed to join stderr reader>".to_string());

        if !status.success() {
            let tail = stderr_tail.trim();
            let message = if tail.is_empty() {
                format!("{} failed ({status})", self.name())
            } else {
                format!("{} failed ({status}): {tail}", self.name())
            };
            return Err(MontageError::engine(message));
        }

        tracing::info!(
            elapsed_secs = started.elapsed().as_secs_f64(),
            "Renderer finished"
        );
        Ok(())
    }
}

/// Resolve the first available renderer program.
pub fn resolve_program(candidates: &[String]) -> MontageResult<PathBuf> {
    for candidate in candidates {
        if let Some(path) = find_program(candidate) {
            tracing::debug!(candidate = %candidate, path = %path.display(), "Resolved renderer");
            return Ok(path);
        }
        tracing::debug!(candidate = %candidate, "Renderer candidate not found");
    }
    Err(MontageError::engine(format!(
        "No renderer found (tried: {}). Install editly or set {RENDERER_ENV} / --renderer",
        candidates.join(", ")
    )))
}

/// Locate an executable by path or on `PATH`.
pub fn find_program(name: &str) -> Option<PathBuf> {
    let path = Path::new(name);
    if path.is_absolute() || path.components().count() > 1 {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().ok()?.join(path)
        };
        return is_executable(&path).then_some(path);
    }

    let search = std::env::var_os("PATH")?;
    std::env::split_paths(&search).find_map(|dir| executable_in(&dir, name))
}

fn executable_in(dir: &Path, name: &str) -> Option<PathBuf> {
    let candidate = dir.join(name);
    if is_executable(&candidate) {
        return Some(candidate);
    }
    #[cfg(windows)]
    for ext in ["exe", "cmd", "bat"] {
        let with_ext = candidate.with_extension(ext);
        if is_executable(&with_ext) {
            return Some(with_ext);
        }
    }
    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn write_job_file(job: &JobDescription) -> MontageResult<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("montage-job-")
        .suffix(".json")
        .tempfile()
        .map_err(|e| MontageError::engine(format!("Failed to create job file: {e}")))?;
    serde_json::to_writer_pretty(&mut file, job)?;
    file.flush()
        .map_err(|e| MontageError::engine(format!("Failed to write job file: {e}")))?;
    Ok(file)
}

async fn drain_stderr(stderr: ChildStderr) -> String {
    let mut lines = BufReader::new(stderr).lines();
    let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                tracing::debug!(line = %line, "renderer stderr");
                if tail.len() == STDERR_TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
            Ok(None) => break,
            Err(err) => {
                tail.push_back(format!("<failed to read renderer stderr: {err}>"));
                break;
            }
        }
    }
    Vec::from(tail).join("\n")
}
