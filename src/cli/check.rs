//! Check command implementation
//!
//! Runs the migration as a dry run: nothing is written, and the exit code
//! says whether any file still needs rewriting.

use crate::cli::args::{ColorChoice, RunArgs};
use crate::cli::common::{self, EXIT_ERROR, EXIT_PENDING, EXIT_SUCCESS};

/// Run the check command
///
/// # Returns
///
/// Exit code:
/// - 0: No file would change
/// - 1: At least one file would change
/// - 2: Configuration, rule compilation or discovery failed
/// - 3: Invalid TOML configuration
pub fn run_check(args: &RunArgs, color: Option<ColorChoice>, verbose: bool) -> i32 {
    let execution = match common::execute(args, color, true) {
        Ok(execution) => execution,
        Err(e) => {
            eprintln!("Error: {}", e);
            return common::exit_code(&e);
        }
    };

    if let Err(e) = common::print_report(&execution, verbose) {
        eprintln!("Error: {}", e);
        return EXIT_ERROR;
    }

    if execution.report.changed() > 0 {
        EXIT_PENDING
    } else {
        EXIT_SUCCESS
    }
}
