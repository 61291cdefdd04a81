//! Command-line argument parsing.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::builder::NonEmptyStringValueParser;
use clap::error::ErrorKind;
use clap::{Arg, Command, CommandFactory, Parser};
use montage_common::error::{MontageError, MontageResult};
use montage_job::JobOverrides;
use serde_json::Number;

/// Binary name used in usage text.
pub const BIN_NAME: &str = "montage";

/// Options for one invocation.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = BIN_NAME,
    about = "Render a video composition from a JSON or JSON5 job config",
    version,
    author,
    args_override_self = true
)]
pub struct CliOptions {
    /// Job config file (JSON5 when it ends in .json5, strict JSON otherwise)
    #[arg(short = 'c', long = "config", value_name = "PATH", allow_hyphen_values = true)]
    pub config_path: PathBuf,

    /// Override the job's output path (outPath)
    #[arg(
        short,
        long,
        value_name = "PATH",
        allow_hyphen_values = true,
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub output: Option<String>,

    /// Override the output width
    #[arg(long, value_name = "N", allow_hyphen_values = true, value_parser = parse_number)]
    pub width: Option<Number>,

    /// Override the output height
    #[arg(long, value_name = "N", allow_hyphen_values = true, value_parser = parse_number)]
    pub height: Option<Number>,

    /// Force the renderer's fast mode
    #[arg(long)]
    pub fast: bool,

    /// Print the resolved job instead of rendering it
    #[arg(long)]
    pub dry_run: bool,

    /// Renderer executable (default: $MONTAGE_RENDERER, then the configured program)
    #[arg(long, value_name = "PROGRAM", allow_hyphen_values = true)]
    pub renderer: Option<String>,

    /// Working directory for the renderer process
    #[arg(long, value_name = "DIR", allow_hyphen_values = true)]
    pub cwd: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliOptions {
    /// The values that override the loaded job.
    pub fn overrides(&self) -> JobOverrides {
        JobOverrides {
            output: self.output.clone(),
            width: self.width.clone(),
            height: self.height.clone(),
            fast: self.fast,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Resolve and render a job.
    Run(CliOptions),

    /// Print help or version text and stop.
    Info(String),
}

/// Parse a dimension: any finite number, kept integral when it is one.
fn parse_number(value: &str) -> Result<Number, String> {
    if let Ok(int) = value.parse::<i64>() {
        return Ok(Number::from(int));
    }
    let float = value
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .ok_or_else(|| format!("'{value}' is not a number"))?;
    if float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
        return Ok(Number::from(float as i64));
    }
    Number::from_f64(float).ok_or_else(|| format!("'{value}' is not a number"))
}

/// Walk the tokens one at a time: every token in flag position must be an
/// exact flag spelling, and value-taking flags consume the next token.
///
/// Rejects the shorthand clap would otherwise accept (`--config=x`, `-cx`,
/// combined shorts, `--`).
fn check_tokens(tokens: &[OsString]) -> MontageResult<()> {
    let mut command = CliOptions::command();
    command.build();

    let mut tokens = tokens.iter();
    while let Some(token) = tokens.next() {
        let flag = token.to_str().and_then(|text| find_flag(&command, text));
        let Some(flag) = flag else {
            return Err(MontageError::usage(format!(
                "error: unexpected argument '{}'",
                token.to_string_lossy()
            )));
        };
        if flag.get_action().takes_values() {
            tokens.next();
        }
    }
    Ok(())
}

fn find_flag<'a>(command: &'a Command, token: &str) -> Option<&'a Arg> {
    if let Some(long) = token.strip_prefix("--").filter(|long| !long.is_empty()) {
        return command.get_arguments().find(|arg| arg.get_long() == Some(long));
    }
    let mut chars = token.strip_prefix('-')?.chars();
    match (chars.next(), chars.next()) {
        (Some(short), None) if short != '-' => {
            command.get_arguments().find(|arg| arg.get_short() == Some(short))
        }
        _ => None,
    }
}

/// Parse command-line tokens, excluding the program name.
pub fn parse_args<I, T>(tokens: I) -> MontageResult<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let tokens: Vec<OsString> = tokens.into_iter().map(Into::into).collect();
    check_tokens(&tokens)?;

    let argv = std::iter::once(OsString::from(BIN_NAME)).chain(tokens);
    match CliOptions::try_parse_from(argv) {
        Ok(options) => Ok(Invocation::Run(options)),
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            Ok(Invocation::Info(err.render().to_string()))
        }
        Err(err) => Err(MontageError::usage(err.render().to_string().trim_end())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(tokens: &[&str]) -> CliOptions {
        match parse_args(tokens.iter().copied()) {
            Ok(Invocation::Run(options)) => options,
            other => panic!("expected options for {tokens:?}, got {other:?}"),
        }
    }

    fn usage_error(tokens: &[&str]) -> MontageError {
        match parse_args(tokens.iter().copied()) {
            Err(err) => {
                assert!(err.is_usage(), "expected usage error, got {err:?}");
                err
            }
            Ok(other) => panic!("expected usage error for {tokens:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_config_only_leaves_everything_else_unset() {
        let options = run(&["--config", "cfg.json"]);
        assert_eq!(options.config_path, PathBuf::from("cfg.json"));
        assert_eq!(options.overrides(), JobOverrides::default());
        assert!(!options.dry_run);
        assert!(!options.verbose);
        assert_eq!(options.renderer, None);
    }

    #[test]
    fn test_all_override_flags() {
        let options = run(&[
            "-c", "cfg.json5", "-o", "b.mp4", "--width", "1920", "--height", "1080", "--fast",
        ]);
        assert_eq!(options.config_path, PathBuf::from("cfg.json5"));
        assert_eq!(
            options.overrides(),
            JobOverrides {
                output: Some("b.mp4".to_string()),
                width: Some(Number::from(1920)),
                height: Some(Number::from(1080)),
                fast: true,
            }
        );
    }

    #[test]
    fn test_tool_flags() {
        let options = run(&[
            "--config", "cfg.json", "--dry-run", "--renderer", "./node_modules/.bin/editly",
            "--cwd", "/srv/render", "-v",
        ]);
        assert!(options.dry_run);
        assert!(options.verbose);
        assert_eq!(options.renderer.as_deref(), Some("./node_modules/.bin/editly"));
        assert_eq!(options.cwd, Some(PathBuf::from("/srv/render")));
    }

    #[test]
    fn test_dimensions_are_not_range_checked() {
        let options = run(&["--config", "cfg.json", "--width", "-5", "--height", "0"]);
        assert_eq!(options.width, Some(Number::from(-5)));
        assert_eq!(options.height, Some(Number::from(0)));
    }

    #[test]
    fn test_dimensions_accept_any_number() {
        let options = run(&["--config", "cfg.json", "--width", "1280.5", "--height", "1e3"]);
        assert_eq!(options.width, Number::from_f64(1280.5));
        assert_eq!(options.height, Some(Number::from(1000)));

        let options = run(&["--config", "cfg.json", "--width", "1e3", "--height", "-2.5"]);
        assert_eq!(options.width, Some(Number::from(1000)));
        assert_eq!(options.height, Number::from_f64(-2.5));
    }

    #[test]
    fn test_value_flag_takes_next_token_verbatim() {
        let options = run(&["--config", "cfg.json", "--output", "--fast"]);
        assert_eq!(options.output.as_deref(), Some("--fast"));
        assert!(!options.fast);
    }

    #[test]
    fn test_repeated_flag_last_wins() {
        let options = run(&["-o", "a.mp4", "--config", "one.json", "-o", "b.mp4", "-c", "two.json"]);
        assert_eq!(options.output.as_deref(), Some("b.mp4"));
        assert_eq!(options.config_path, PathBuf::from("two.json"));

        let options = run(&["--fast", "--config", "cfg.json", "--fast"]);
        assert!(options.fast);
    }

    #[test]
    fn test_missing_config_is_usage_error() {
        let err = usage_error(&["--output", "b.mp4", "--fast"]);
        assert!(err.to_string().contains("--config"));
        usage_error(&[]);
    }

    #[test]
    fn test_unknown_token_is_usage_error() {
        let err = usage_error(&["--config", "cfg.json", "--loop"]);
        assert!(err.to_string().contains("--loop"));
        usage_error(&["--config", "cfg.json", "extra.json"]);
    }

    #[test]
    fn test_trailing_value_flag_is_usage_error() {
        usage_error(&["--config"]);
        usage_error(&["--config", "cfg.json", "-o"]);
        usage_error(&["--config", "cfg.json", "--width"]);
    }

    #[test]
    fn test_non_numeric_dimension_is_usage_error() {
        let err = usage_error(&["--config", "cfg.json", "--width", "wide"]);
        assert!(err.to_string().contains("wide"));
        usage_error(&["--config", "cfg.json", "--height", "NaN"]);
        usage_error(&["--config", "cfg.json", "--height", "inf"]);
        usage_error(&["--config", "cfg.json", "--width", ""]);
    }

    #[test]
    fn test_empty_output_is_usage_error() {
        usage_error(&["--config", "cfg.json", "--output", ""]);
        usage_error(&["--config", "cfg.json", "-o", ""]);
    }

    #[test]
    fn test_flag_shorthand_is_usage_error() {
        let err = usage_error(&["--config=cfg.json"]);
        assert!(err.to_string().contains("--config=cfg.json"));
        usage_error(&["-ccfg.json"]);
        usage_error(&["--config", "cfg.json", "--"]);
        usage_error(&["--config", "cfg.json", "-vo", "x.mp4"]);
        usage_error(&["--config", "cfg.json", "--fast=true"]);
        usage_error(&["--config", "cfg.json", "-"]);
    }

    #[test]
    fn test_values_are_not_checked_as_flags() {
        let options = run(&["--config", "-c", "--output", "-vo", "--renderer", "--fast"]);
        assert_eq!(options.config_path, PathBuf::from("-c"));
        assert_eq!(options.output.as_deref(), Some("-vo"));
        assert_eq!(options.renderer.as_deref(), Some("--fast"));
        assert!(!options.fast);
    }

    #[test]
    fn test_help_and_version_are_not_errors() {
        match parse_args(["--help"]) {
            Ok(Invocation::Info(text)) => assert!(text.contains("--config")),
            other => panic!("expected help text, got {other:?}"),
        }
        match parse_args(["--version"]) {
            Ok(Invocation::Info(text)) => assert!(text.contains(env!("CARGO_PKG_VERSION"))),
            other => panic!("expected version text, got {other:?}"),
        }
    }

    /// Token groups for the override flags, each optionally present.
    fn arb_override_groups() -> impl Strategy<Value = Vec<Vec<String>>> {
        (
            proptest::option::of(("[a-z]{1,8}\\.(mp4|gif)", any::<bool>())),
            proptest::option::of(-4096i64..8192),
            proptest::option::of(-4096i64..8192),
            any::<bool>(),
        )
            .prop_map(|(output, width, height, fast)| {
                let mut groups = Vec::new();
                if let Some((path, short)) = output {
                    let flag = if short { "-o" } else { "--output" };
                    groups.push(vec![flag.to_string(), path]);
                }
                if let Some(width) = width {
                    groups.push(vec!["--width".to_string(), width.to_string()]);
                }
                if let Some(height) = height {
                    groups.push(vec!["--height".to_string(), height.to_string()]);
                }
                if fast {
                    groups.push(vec!["--fast".to_string()]);
                }
                groups
            })
    }

    fn flatten(groups: Vec<Vec<String>>) -> Vec<String> {
        groups.into_iter().flatten().collect()
    }

    proptest! {
        #[test]
        fn prop_valid_sequences_keep_config_path(
            groups in arb_override_groups(),
            config in "[a-z][a-z0-9_/]{0,12}\\.json5?",
            short in any::<bool>(),
            seed in any::<prop::sample::Index>(),
        ) {
            let mut groups = groups;
            let flag = if short { "-c" } else { "--config" };
            let at = seed.index(groups.len() + 1);
            groups.insert(at, vec![flag.to_string(), config.clone()]);

            let options = match parse_args(flatten(groups)) {
                Ok(Invocation::Run(options)) => options,
                other => return Err(TestCaseError::fail(format!("unexpected {other:?}"))),
            };
            prop_assert_eq!(options.config_path, PathBuf::from(config));
        }

        #[test]
        fn prop_sequences_without_config_fail(groups in arb_override_groups()) {
            let result = parse_args(flatten(groups));
            prop_assert!(matches!(result, Err(ref err) if err.is_usage()));
        }

        #[test]
        fn prop_trailing_value_flag_fails(
            groups in arb_override_groups(),
            trailing in prop::sample::select(vec!["--config", "-c", "--output", "-o", "--width", "--height"]),
        ) {
            let mut tokens = vec!["--config".to_string(), "cfg.json".to_string()];
            tokens.extend(flatten(groups));
            tokens.push(trailing.to_string());

            let result = parse_args(tokens);
            prop_assert!(matches!(result, Err(ref err) if err.is_usage()));
        }
    }
}
