#![forbid(unsafe_code)]

//! Run report: per-file outcomes and the counts derived from them

use crate::error::FileError;
use crate::types::RelPath;
use std::path::{Path, PathBuf};

/// Terminal state of one file
#[derive(Debug)]
pub enum Outcome {
    /// Rules produced identical content; the file was not touched
    Unchanged,
    /// Rules changed the content
    ///
    /// `written` is false in dry-run mode, where nothing is persisted.
    Changed { replacements: usize, written: bool },
    /// The file could not be read, decoded, visited or written
    Failed(FileError),
}

/// Outcome of a single file within a run
#[derive(Debug)]
pub struct FileOutcome {
    /// Path used for reading and writing
    pub path: PathBuf,
    /// Path relative to the migration root
    pub relative: RelPath,
    /// What happened to the file
    pub outcome: Outcome,
}

impl FileOutcome {
    /// Error recorded for this file, if any
    pub fn error(&self) -> Option<&FileError> {
        match &self.outcome {
            Outcome::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Check if the file's content changed
    pub fn is_changed(&self) -> bool {
        matches!(self.outcome, Outcome::Changed { .. })
    }
}

/// Immutable summary of a run
#[derive(Debug)]
pub struct RunReport {
    outcomes: Vec<FileOutcome>,
    changed: usize,
    unchanged: usize,
    errored: usize,
    dry_run: bool,
}

impl RunReport {
    /// Number of files the run looked at, including failures
    pub fn scanned(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of files whose content changed
    pub fn changed(&self) -> usize {
        self.changed
    }

    /// Number of files left untouched
    pub fn unchanged(&self) -> usize {
        self.unchanged
    }

    /// Number of files that failed
    pub fn error_count(&self) -> usize {
        self.errored
    }

    /// Whether changes were computed without being written
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Check if any file failed
    pub fn has_errors(&self) -> bool {
        self.errored > 0
    }

    /// All outcomes, ordered by relative path
    pub fn outcomes(&self) -> &[FileOutcome] {
        &self.outcomes
    }

    /// Failed files with their errors, ordered by relative path
    pub fn errors(&self) -> impl Iterator<Item = (&Path, &FileError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.error().map(|e| (o.path.as_path(), e)))
    }

    /// Changed files, ordered by relative path
    pub fn changed_files(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.is_changed())
    }
}

/// Accumulator owned by whoever drives the run
#[derive(Debug, Default)]
pub struct ReportBuilder {
    outcomes: Vec<FileOutcome>,
    changed: usize,
    unchanged: usize,
    errored: usize,
    dry_run: bool,
}

impl ReportBuilder {
    /// Creates an empty accumulator
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Fold one outcome in; each outcome bumps exactly one counter
    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome.outcome {
            Outcome::Unchanged => self.unchanged += 1,
            Outcome::Changed { .. } => self.changed += 1,
            Outcome::Failed(_) => self.errored += 1,
        }
        self.outcomes.push(outcome);
    }

    /// Seal the report, ordering outcomes by relative path
    pub fn finish(mut self) -> RunReport {
        self.outcomes
            .sort_by(|a, b| a.relative.cmp(&b.relative).then_with(|| a.path.cmp(&b.path)));
        RunReport {
            outcomes: self.outcomes,
            changed: self.changed,
            unchanged: self.unchanged,
            errored: self.errored,
            dry_run: self.dry_run,
        }
    }
}
