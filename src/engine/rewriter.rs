#![forbid(unsafe_code)]

//! Per-file rewriting
//!
//! Reads a file as strict UTF-8 and runs it through the rules resolved for
//! its location. Nothing here writes to the filesystem.

use crate::engine::file_walker::FileEntry;
use crate::error::FileError;
use crate::rules::{Rewrite, RuleSet};
use crate::types::RelPath;
use std::fs;

/// A file read and transformed, waiting to be committed or discarded
#[derive(Debug)]
pub struct FileTask {
    /// File being processed
    pub entry: FileEntry,
    /// Content as read; empty when reading failed
    pub original: String,
    /// Content after every applicable rule; `None` when reading failed
    pub rewritten: Option<String>,
    /// Number of substitutions performed
    pub replacements: usize,
    /// Whether `rewritten` differs from `original`
    pub changed: bool,
    /// Read or decode failure
    pub error: Option<FileError>,
}

impl FileTask {
    fn failed(entry: FileEntry, error: FileError) -> Self {
        Self {
            entry,
            original: String::new(),
            rewritten: None,
            replacements: 0,
            changed: false,
            error: Some(error),
        }
    }
}

/// Applies a rule set to individual files
#[derive(Debug, Clone, Copy)]
pub struct RewriteEngine<'r> {
    rules: &'r RuleSet,
}

impl<'r> RewriteEngine<'r> {
    /// Creates an engine borrowing the run's rule set
    pub fn new(rules: &'r RuleSet) -> Self {
        Self { rules }
    }

    /// Rewrite content as if it lived at `relative`
    pub fn rewrite_content(&self, relative: &RelPath, content: &str) -> Rewrite {
        self.rules.resolve(relative).apply_counted(content)
    }

    /// Read and transform one file
    ///
    /// Read and decode failures are returned inside the task, with
    /// `changed` left false.
    pub fn rewrite_file(&self, entry: FileEntry) -> FileTask {
        let bytes = match fs::read(&entry.path) {
            Ok(bytes) => bytes,
            Err(e) => return FileTask::failed(entry, FileError::Read(e)),
        };

        let original = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                let offset = e.utf8_error().valid_up_to();
                return FileTask::failed(entry, FileError::Decode { offset });
            }
        };

        let rewrite = self.rewrite_content(&entry.relative, &original);
        let changed = rewrite.content != original;

        FileTask {
            entry,
            original,
            rewritten: Some(rewrite.content),
            replacements: rewrite.replacements,
            changed,
            error: None,
        }
    }
}
