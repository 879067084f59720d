//! CLI module for retrial harness binaries
//!
//! A harness binary (`harness = false`) builds its [`Roster`] and hands it to [`run`]:
//!
//! ```no_run
//! use retrial::{ClassObject, Roster, TestOptions};
//!
//! fn main() {
//!     let roster = Roster::new().with_class(
//!         ClassObject::new("Smoke").test_case("ping", TestOptions::new(), |_| Ok(())),
//!     );
//!     retrial::cli::run(&roster);
//! }
//! ```
//!
//! ## Usage
//!
//! - `harness [SUITE]...` - run the named suites (default: all, in registration order)
//! - `--tags <FILE|JSON>` - tag configuration, as a file path or an inline JSON object
//! - `--list` - print the registered suite ids and exit
//! - `-q` - do not print the summary line
//! - `-v` - also report skipped tests and classes (default console listener)
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! [`execute`] returns `CliResult<ExitCode>` instead of calling `process::exit`.
//! Only the top-level [`run`] function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::fmt;
use std::path::Path;
use std::process;

use clap::Parser;

use crate::config::{RunConfig, TagConfig};
use crate::errors::{EngineError, EngineResult};
use crate::ledger::Ledger;
use crate::runner::Runner;
use crate::suite::Roster;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    /// At least one test ended as fail, error or ignore
    pub const FAILURE: ExitCode = ExitCode(1);
    /// The engine itself failed (listener, configuration, aborted run)
    pub const FATAL: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Render a fatal engine error through miette.
    pub fn fatal(err: EngineError) -> Self {
        Self::new(format!("{:?}", miette::Report::new(err)), ExitCode::FATAL)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Run registered test suites with per-test and per-suite retries
#[derive(Parser, Debug)]
#[command(name = "retrial")]
#[command(version)]
#[command(about = "Run registered test suites with per-test and per-suite retries", long_about = None)]
pub struct Cli {
    /// Suites to run (default: every registered suite)
    #[arg(value_name = "SUITE")]
    pub suites: Vec<String>,

    /// Tag configuration: a JSON file path or an inline JSON object
    #[arg(long = "tags", value_name = "FILE|JSON")]
    pub tags: Option<String>,

    /// List registered suites and exit
    #[arg(long)]
    pub list: bool,

    /// Do not print the summary line
    #[arg(short, long)]
    pub quiet: bool,

    /// Report skipped tests and classes too
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Build the run configuration, loading `--tags` if given.
    pub fn run_config(&self) -> EngineResult<RunConfig> {
        let tag_config = self.tags.as_deref().map(load_tag_config).transpose()?;
        Ok(RunConfig::new()
            .with_tag_config(tag_config)
            .with_quiet(self.quiet)
            .with_verbose(self.verbose))
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Install the tracing subscriber: `RUST_LOG` filter, defaulting to `warn`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Main harness entry point.
///
/// This is the only place where `process::exit` is called.
pub fn run(roster: &Roster) {
    init_tracing();
    let cli = Cli::parse();

    match execute(roster, cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the parsed command against `roster` and return the exit code.
pub fn execute(roster: &Roster, cli: Cli) -> CliResult<ExitCode> {
    if cli.list {
        for id in roster.ids() {
            println!("{id}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = cli.run_config().map_err(CliError::fatal)?;

    let runner = Runner::new(roster, config);
    let mut ledger = Ledger::new();
    let summary = if cli.suites.is_empty() {
        runner.run_all(&mut ledger)
    } else {
        runner.run(&mut ledger, &cli.suites)
    }
    .map_err(CliError::fatal)?;

    if summary.has_failures() {
        // Summary already printed
        Err(CliError::new("", ExitCode::FAILURE))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Inline JSON when the argument looks like an object, a file path otherwise.
fn load_tag_config(arg: &str) -> EngineResult<TagConfig> {
    if arg.trim_start().starts_with('{') {
        arg.parse()
    } else {
        TagConfig::from_path(Path::new(arg))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::errors::TestError;
    use crate::listener::SilentListener;
    use crate::suite::{ClassObject, TestOptions};

    fn roster() -> Roster {
        Roster::new()
            .with_class(
                ClassObject::new("Green")
                    .with_listener(|_| SilentListener)
                    .test_case("ok", TestOptions::new().with_tags(["fast"]), |_| Ok(())),
            )
            .with_class(
                ClassObject::new("Red").with_listener(|_| SilentListener).test_case(
                    "broken",
                    TestOptions::new().with_tags(["slow"]),
                    |_| Err(TestError::assertion("nope")),
                ),
            )
    }

    #[test]
    fn test_cli_parse_suites_and_flags() {
        let cli = Cli::try_parse_from(["retrial", "A", "B", "--tags", "{}", "-q"]).unwrap();
        assert_eq!(cli.suites, ["A", "B"]);
        assert_eq!(cli.tags.as_deref(), Some("{}"));
        assert!(cli.quiet);
        assert!(!cli.list);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_verbose_flag_reaches_run_config() {
        let cli = Cli::try_parse_from(["retrial", "-v", "--tags", r#"{"run_any": "smoke"}"#]).unwrap();
        let config = cli.run_config().unwrap();
        assert!(config.verbose);
        assert!(!config.quiet);
        assert_eq!(config.tag_config(), Some(&TagConfig::run_on_match_any(["smoke"])));
        assert!(ClassObject::new("C").console_listener(&config).verbose);
    }

    #[test]
    fn test_cli_parse_defaults() {
        let cli = Cli::try_parse_from(["retrial"]).unwrap();
        assert!(cli.suites.is_empty());
        assert!(cli.tags.is_none());
    }

    #[test]
    fn test_green_suite_succeeds() {
        let cli = Cli::try_parse_from(["retrial", "-q", "Green"]).unwrap();
        assert_eq!(execute(&roster(), cli).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn test_failing_suite_exits_with_failure() {
        let cli = Cli::try_parse_from(["retrial", "-q"]).unwrap();
        let err = execute(&roster(), cli).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.is_empty());
    }

    #[test]
    fn test_tag_config_can_exclude_the_failure() {
        let cli = Cli::try_parse_from(["retrial", "-q", "--tags", r#"{"run_on_match_any": ["fast"]}"#]).unwrap();
        assert_eq!(execute(&roster(), cli).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn test_bad_tag_config_is_fatal() {
        let cli = Cli::try_parse_from(["retrial", "-q", "--tags", r#"{"bogus": []}"#]).unwrap();
        let err = execute(&roster(), cli).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FATAL);
        assert!(err.message.contains("invalid tag configuration"));
    }
}
