//! Tool configuration.
//!
//! This is the configuration of `montage` itself (which renderer to run,
//! how to log), not the job document handed to the renderer.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{MontageError, MontageResult};

/// Environment variable naming the renderer executable.
pub const RENDERER_ENV: &str = "MONTAGE_RENDERER";

/// Global tool configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// External renderer settings.
    pub renderer: RendererConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// How to invoke the external renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Renderer executable, looked up on `PATH` unless it is a path.
    pub program: String,

    /// Extra arguments placed before the job file argument.
    pub args: Vec<String>,

    /// Working directory for the renderer process.
    pub working_dir: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "warn", "debug", "montage_job=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path. Logs go to stderr when unset.
    pub file: Option<PathBuf>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            program: "editly".to_string(),
            args: Vec::new(),
            working_dir: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location.
    ///
    /// A missing file yields defaults. An unreadable or malformed file is an
    /// error; callers warn and fall back to defaults.
    pub fn load() -> MontageResult<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load config from `path`.
    pub fn load_from(path: &Path) -> MontageResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            MontageError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            MontageError::config(format!("Failed to parse {}: {e}", path.display()))
        })
    }
}

impl RendererConfig {
    /// Renderer programs to try, in priority order: the explicit CLI value,
    /// then `MONTAGE_RENDERER`, then the configured program.
    pub fn program_candidates(&self, explicit: Option<&str>) -> Vec<String> {
        let from_env = std::env::var(RENDERER_ENV).ok();
        self.candidates_with_env(explicit, from_env.as_deref())
    }

    fn candidates_with_env(&self, explicit: Option<&str>, from_env: Option<&str>) -> Vec<String> {
        let mut candidates: Vec<String> = Vec::new();
        for candidate in [explicit, from_env, Some(self.program.as_str())]
            .into_iter()
            .flatten()
        {
            let candidate = candidate.trim();
            if !candidate.is_empty() && !candidates.iter().any(|c| c == candidate) {
                candidates.push(candidate.to_string());
            }
        }
        candidates
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("montage").join("config.json")
}
