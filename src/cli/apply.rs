//! Apply command implementation
//!
//! Rewrites every matching file under the migration root in place and
//! reports what changed.

use crate::cli::args::{ColorChoice, RunArgs};
use crate::cli::common::{self, EXIT_ERROR, EXIT_SUCCESS};

/// Run the apply command
///
/// # Returns
///
/// Exit code:
/// - 0: The run completed; per-file errors are listed in the report
/// - 2: Configuration, rule compilation or discovery failed
/// - 3: Invalid TOML configuration
pub fn run_apply(args: &RunArgs, color: Option<ColorChoice>, verbose: bool) -> i32 {
    let execution = match common::execute(args, color, false) {
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

    EXIT_SUCCESS
}
