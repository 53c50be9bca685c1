//! File discovery, rewriting and write-back

pub mod coordinator;
pub mod file_walker;
pub mod report;
pub mod rewriter;

pub use coordinator::{WriteBackCoordinator, write_atomic};
pub use file_walker::{FileEntry, FileWalker, TraversalFilter};
pub use report::{FileOutcome, Outcome, RunReport};
pub use rewriter::{FileTask, RewriteEngine};

use crate::error::DiscoveryError;
use std::path::Path;

/// Discover files under `root` and run them through `coordinator`
///
/// Fails before touching any file if the root cannot be walked. Per-file
/// problems, including entries the walk could not visit, end up in the
/// report instead.
pub fn migrate(
    root: &Path,
    filter: TraversalFilter,
    coordinator: &WriteBackCoordinator,
    parallel: bool,
) -> Result<RunReport, DiscoveryError> {
    let files = FileWalker::new(root, filter)?.walk();
    let report = if parallel {
        coordinator.run_parallel(root, files)
    } else {
        coordinator.run_discovered(root, files)
    };
    Ok(report)
}
