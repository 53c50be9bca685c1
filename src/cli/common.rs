//! Common helper functions shared across CLI commands
//!
//! Loading configuration, picking output settings and driving a migration
//! run are the same for `apply` and `check`; only the dry-run flag and the
//! exit-code mapping differ.

use crate::cli::args::{ColorChoice, OutputFormat, RunArgs};
use crate::config::Config;
use crate::engine::{RunReport, WriteBackCoordinator, migrate};
use crate::error::{ConfigError, RewireError};
use crate::output::{HumanFormatter, JsonlFormatter};
use std::io::Write;
use std::path::{Path, PathBuf};
use termcolor::StandardStream;

/// Exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_PENDING: i32 = 1;
pub const EXIT_ERROR: i32 = 2;
pub const EXIT_PARSE_ERROR: i32 = 3;

/// Exit code for an error that aborted a run
pub(crate) fn exit_code(error: &RewireError) -> i32 {
    match error {
        RewireError::Config(ConfigError::Parse(_)) => EXIT_PARSE_ERROR,
        _ => EXIT_ERROR,
    }
}

/// Load a rewire.toml configuration
///
/// # Errors
///
/// Returns `ConfigError::Io` if the file does not exist or cannot be read.
/// Returns `ConfigError::Parse` if the TOML is invalid.
pub(crate) fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!(
                "{} not found. Run 'rewire init' to create it.",
                path.display()
            ),
        )));
    }

    Config::load(path)
}

/// Directory that relative roots in `config_path` are resolved against
pub(crate) fn config_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Resolve the terminal color choice from the flag and the configuration
pub(crate) fn color_choice(
    flag: Option<ColorChoice>,
    config: &Config,
) -> termcolor::ColorChoice {
    let choice = flag.unwrap_or_else(|| config.output.color.into());
    match choice {
        ColorChoice::Always => termcolor::ColorChoice::Always,
        ColorChoice::Never => termcolor::ColorChoice::Never,
        ColorChoice::Auto => {
            if std::io::IsTerminal::is_terminal(&std::io::stdout()) {
                termcolor::ColorChoice::Auto
            } else {
                termcolor::ColorChoice::Never
            }
        }
    }
}

/// A finished migration plus the output settings it should be printed with
pub(crate) struct Execution {
    pub(crate) report: RunReport,
    pub(crate) format: OutputFormat,
    pub(crate) color: termcolor::ColorChoice,
}

/// Load configuration, compile rules and run the migration
///
/// # Errors
///
/// Returns `RewireError` when the configuration, the rule tables or the
/// root directory are unusable. Per-file failures are part of the report.
pub(crate) fn execute(
    args: &RunArgs,
    color: Option<ColorChoice>,
    dry_run: bool,
) -> Result<Execution, RewireError> {
    let config = load_config(&args.config)?;
    let rules = config.build_rules()?;

    let root = match &args.root {
        Some(root) => root.clone(),
        None => config.resolve_root(&config_dir(&args.config)),
    };

    tracing::debug!(
        config = %args.config.display(),
        root = %root.display(),
        rules = rules.len(),
        scopes = rules.scopes().len(),
        dry_run,
        "starting migration"
    );

    let coordinator = WriteBackCoordinator::new(rules).dry_run(dry_run);
    let filter = config.filter().skip_file(&args.config);

    let report = match args.jobs {
        1 => migrate(&root, filter, &coordinator, false)?,
        0 => migrate(&root, filter, &coordinator, true)?,
        jobs => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
            pool.install(|| migrate(&root, filter, &coordinator, true))?
        }
    };

    Ok(Execution {
        report,
        format: args.format.unwrap_or_else(|| config.output.format.into()),
        color: color_choice(color, &config),
    })
}

/// Print a report in the requested format
///
/// # Errors
///
/// Returns an I/O error if stdout cannot be written.
pub(crate) fn print_report(execution: &Execution, verbose: bool) -> std::io::Result<()> {
    match execution.format {
        OutputFormat::Human => {
            let mut stdout = StandardStream::stdout(execution.color);
            HumanFormatter::new(verbose).write(&execution.report, &mut stdout)?;
            stdout.flush()
        }
        OutputFormat::Jsonl => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(JsonlFormatter::new().format(&execution.report).as_bytes())?;
            stdout.flush()
        }
    }
}
