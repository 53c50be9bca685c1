#![forbid(unsafe_code)]

//! JSONL output formatter for machine-readable output
//!
//! Outputs one JSON object per line in a deterministic order:
//! 1. One file record per outcome (sorted by relative path)
//! 2. One summary record

use crate::engine::{Outcome, RunReport};
use serde::Serialize;

/// JSONL output formatter
pub struct JsonlFormatter;

impl JsonlFormatter {
    /// Creates a new JsonlFormatter
    pub fn new() -> Self {
        JsonlFormatter
    }

    /// Format the run report as JSONL
    pub fn format(&self, report: &RunReport) -> String {
        let mut output = String::new();

        for file in report.outcomes() {
            let record = match &file.outcome {
                Outcome::Unchanged => FileRecord {
                    record_type: "file",
                    path: file.relative.to_string(),
                    status: "unchanged",
                    replacements: 0,
                    written: false,
                    error_kind: None,
                    message: None,
                },
                Outcome::Changed {
                    replacements,
                    written,
                } => FileRecord {
                    record_type: "file",
                    path: file.relative.to_string(),
                    status: "changed",
                    replacements: *replacements,
                    written: *written,
                    error_kind: None,
                    message: None,
                },
                Outcome::Failed(e) => FileRecord {
                    record_type: "file",
                    path: file.relative.to_string(),
                    status: "error",
                    replacements: 0,
                    written: false,
                    error_kind: Some(e.kind()),
                    message: Some(e.to_string()),
                },
            };

            if let Ok(json) = serde_json::to_string(&record) {
                output.push_str(&json);
                output.push('\n');
            }
        }

        let summary = SummaryRecord {
            record_type: "summary",
            scanned: report.scanned() as u64,
            changed: report.changed() as u64,
            unchanged: report.unchanged() as u64,
            errors: report.error_count() as u64,
            dry_run: report.is_dry_run(),
        };

        if let Ok(json) = serde_json::to_string(&summary) {
            output.push_str(&json);
            output.push('\n');
        }

        output
    }
}

impl Default for JsonlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-file record for JSONL output
#[derive(Debug, Serialize)]
struct FileRecord {
    #[serde(rename = "type")]
    record_type: &'static str,
    path: String,
    status: &'static str,
    replacements: usize,
    written: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Summary record for JSONL output
#[derive(Debug, Serialize)]
struct SummaryRecord {
    #[serde(rename = "type")]
    record_type: &'static str,
    scanned: u64,
    changed: u64,
    unchanged: u64,
    errors: u64,
    dry_run: bool,
}
