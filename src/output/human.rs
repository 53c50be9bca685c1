#![forbid(unsafe_code)]

//! Human-readable report output

use crate::engine::{Outcome, RunReport};
use std::io::{self, Write};
use termcolor::{Color, ColorSpec, WriteColor};

/// Human-readable formatter
///
/// Lists changed and failed files, then a summary. Unchanged files are
/// listed only in verbose mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct HumanFormatter {
    verbose: bool,
}

impl HumanFormatter {
    /// Creates a new HumanFormatter
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Write the report to a color-capable stream
    pub fn write(&self, report: &RunReport, out: &mut dyn WriteColor) -> io::Result<()> {
        let (changed_label, changed_color) = if report.is_dry_run() {
            ("Would update", Color::Yellow)
        } else {
            ("Updated", Color::Green)
        };

        for file in report.outcomes() {
            match &file.outcome {
                Outcome::Changed { replacements, .. } => {
                    label(out, changed_label, changed_color)?;
                    writeln!(
                        out,
                        " {} ({} {})",
                        file.relative,
                        replacements,
                        plural(*replacements, "replacement", "replacements")
                    )?;
                }
                Outcome::Failed(e) => {
                    label(out, "Error", Color::Red)?;
                    writeln!(out, " {}: {}", file.relative, e)?;
                }
                Outcome::Unchanged if self.verbose => {
                    writeln!(out, "Unchanged {}", file.relative)?;
                }
                Outcome::Unchanged => {}
            }
        }

        if report.scanned() > 0 {
            writeln!(out)?;
        }

        let verb = if report.is_dry_run() {
            "would change"
        } else {
            "changed"
        };
        writeln!(
            out,
            "Scanned {} {}: {} {}, {} unchanged, {} {}",
            report.scanned(),
            plural(report.scanned(), "file", "files"),
            report.changed(),
            verb,
            report.unchanged(),
            report.error_count(),
            plural(report.error_count(), "error", "errors"),
        )?;

        Ok(())
    }

    /// Render the report to a plain string
    pub fn format(&self, report: &RunReport) -> String {
        let mut buffer = termcolor::Buffer::no_color();
        // Writing into an in-memory buffer cannot fail
        let _ = self.write(report, &mut buffer);
        String::from_utf8_lossy(buffer.as_slice()).into_owned()
    }
}

fn label(out: &mut dyn WriteColor, text: &str, color: Color) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{}:", text)?;
    out.reset()
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
