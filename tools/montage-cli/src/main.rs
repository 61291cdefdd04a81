//! Montage CLI: render a video composition from a job config file.
//!
//! Usage:
//!   montage --config <PATH> [--output <PATH>] [--width <N>] [--height <N>] [--fast]
//!
//! The config is loaded (JSON, or JSON5 for `.json5` files), command-line
//! overrides are layered on top, and the resolved job is handed to the
//! external renderer. Any failure exits with status 1.

use std::process::ExitCode;

use anyhow::Context;
use montage_common::config::AppConfig;
use montage_common::logging::init_logging;
use montage_render_engine::{ProcessEngine, NOTICE_PREFIX};

mod args;
mod pipeline;

use args::{CliOptions, Invocation};

#[tokio::main]
async fn main() -> ExitCode {
    let options = match args::parse_args(std::env::args_os().skip(1)) {
        Ok(Invocation::Run(options)) => options,
        Ok(Invocation::Info(text)) => {
            print!("{text}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("{NOTICE_PREFIX} failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let (app_config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };

    let mut logging = app_config.logging.clone();
    if options.verbose {
        logging.level = "debug".to_string();
    }
    init_logging(&logging);
    if let Some(err) = config_error {
        tracing::warn!(error = %err, "Ignoring tool configuration, using defaults");
    }

    match render(&options, &app_config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{NOTICE_PREFIX} failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn render(options: &CliOptions, app_config: &AppConfig) -> anyhow::Result<()> {
    let make_engine = || {
        ProcessEngine::from_config(
            &app_config.renderer,
            options.renderer.as_deref(),
            options.cwd.clone(),
        )
    };

    pipeline::run(options, make_engine, &mut std::io::stdout())
        .await
        .with_context(|| format!("job {}", options.config_path.display()))
}
