#![forbid(unsafe_code)]

//! Write-back coordination for a migration run
//!
//! This module provides the WriteBackCoordinator which drives each file
//! through read, transform and commit, and folds every outcome into a
//! RunReport. Files are independent: a failure on one file is recorded and
//! the run moves on.

use crate::engine::file_walker::FileEntry;
use crate::engine::report::{FileOutcome, Outcome, ReportBuilder, RunReport};
use crate::engine::rewriter::{FileTask, RewriteEngine};
use crate::error::{DiscoveryError, FileError};
use crate::rules::RuleSet;
use crate::types::RelPath;
use rayon::prelude::*;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Coordinates rewriting and persisting files for one rule set
///
/// The coordinator:
/// - Rewrites each file with the rules resolved for its location
/// - Commits changed content with an atomic replace
/// - Leaves unchanged files untouched
/// - Records every outcome, including failures, in the report
pub struct WriteBackCoordinator {
    rules: Arc<RuleSet>,
    dry_run: bool,
}

impl WriteBackCoordinator {
    /// Creates a coordinator that writes changes back
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules: Arc::new(rules),
            dry_run: false,
        }
    }

    /// Compute changes without writing anything
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Rule set shared by every file in the run
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Process the given files one after another
    ///
    /// Only the given paths are ever written.
    pub fn run<I>(&self, entries: I) -> RunReport
    where
        I: IntoIterator<Item = FileEntry>,
    {
        let mut report = ReportBuilder::new(self.dry_run);
        for entry in entries {
            report.record(self.process(entry));
        }
        self.finish(report)
    }

    /// Process a discovery stream from `root` one file at a time
    ///
    /// Files are rewritten as they are discovered. Walk errors are recorded
    /// against the path they concern, relative to `root`.
    pub fn run_discovered<I>(&self, root: &Path, entries: I) -> RunReport
    where
        I: IntoIterator<Item = Result<FileEntry, DiscoveryError>>,
    {
        let mut report = ReportBuilder::new(self.dry_run);
        for result in entries {
            let outcome = match result {
                Ok(entry) => self.process(entry),
                Err(e) => walk_failure(root, e),
            };
            report.record(outcome);
        }
        self.finish(report)
    }

    /// Process a discovery stream across rayon workers
    ///
    /// Each worker exclusively owns the file it is processing; outcomes are
    /// folded into the report by the calling thread. The resulting report is
    /// identical to the one `run_discovered` produces.
    pub fn run_parallel<I>(&self, root: &Path, entries: I) -> RunReport
    where
        I: IntoIterator<Item = Result<FileEntry, DiscoveryError>>,
    {
        let mut report = ReportBuilder::new(self.dry_run);
        let mut files = Vec::new();

        for result in entries {
            match result {
                Ok(entry) => files.push(entry),
                Err(e) => report.record(walk_failure(root, e)),
            }
        }

        let outcomes: Vec<FileOutcome> = files
            .into_par_iter()
            .map(|entry| self.process(entry))
            .collect();

        for outcome in outcomes {
            report.record(outcome);
        }

        self.finish(report)
    }

    /// Drive a single file through its state machine
    ///
    /// Read → (ReadFailed | Transformed) → (Unchanged | Written | WriteFailed)
    fn process(&self, entry: FileEntry) -> FileOutcome {
        let task = RewriteEngine::new(&self.rules).rewrite_file(entry);
        let FileTask {
            entry,
            rewritten,
            replacements,
            changed,
            error,
            ..
        } = task;

        let outcome = match (error, rewritten) {
            (Some(e), _) => Outcome::Failed(e),
            (None, Some(content)) if changed => self.commit(&entry.path, &content, replacements),
            (None, _) => Outcome::Unchanged,
        };

        match &outcome {
            Outcome::Unchanged => {
                tracing::debug!(path = %entry.relative, "unchanged");
            }
            Outcome::Changed {
                replacements,
                written,
            } => {
                tracing::debug!(path = %entry.relative, replacements, written, "changed");
            }
            Outcome::Failed(e) => {
                tracing::warn!(path = %entry.relative, error = %e, "file skipped");
            }
        }

        FileOutcome {
            path: entry.path,
            relative: entry.relative,
            outcome,
        }
    }

    fn commit(&self, path: &Path, content: &str, replacements: usize) -> Outcome {
        if self.dry_run {
            return Outcome::Changed {
                replacements,
                written: false,
            };
        }

        match write_atomic(path, content) {
            Ok(()) => Outcome::Changed {
                replacements,
                written: true,
            },
            Err(e) => Outcome::Failed(FileError::Write(e)),
        }
    }

    fn finish(&self, report: ReportBuilder) -> RunReport {
        let report = report.finish();
        tracing::info!(
            scanned = report.scanned(),
            changed = report.changed(),
            unchanged = report.unchanged(),
            errors = report.error_count(),
            dry_run = report.is_dry_run(),
            "run complete"
        );
        report
    }
}

/// Turn a walk error into an outcome against the path it concerns
fn walk_failure(root: &Path, err: DiscoveryError) -> FileOutcome {
    let path = match &err {
        DiscoveryError::Walk {
            path: Some(path), ..
        } => path.clone(),
        DiscoveryError::RootNotFound(path)
        | DiscoveryError::NotADirectory(path)
        | DiscoveryError::Unreadable { path, .. } => path.clone(),
        DiscoveryError::Walk { path: None, .. } => PathBuf::new(),
    };
    FileOutcome {
        relative: RelPath::relative_to(root, &path),
        path,
        outcome: Outcome::Failed(FileError::Discovery(err.to_string())),
    }
}

/// Replace `path` with `content` so that readers only ever see the old or
/// the new file
///
/// Content goes to a temporary file in the same directory, is synced, and
/// is renamed over the target. The original permissions are carried over.
/// On any failure the temporary file is removed and the target is left as
/// it was.
pub fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let permissions = fs::metadata(path)?.permissions();

    let mut temp = tempfile::Builder::new()
        .prefix(".rewire-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().set_permissions(permissions)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
