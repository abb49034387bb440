//! Human-readable output formatter.

use std::io::Write;

use console::Style;

use super::ReportFormatter;
use crate::report::{Diagnostic, Severity, Summary};

/// Formats reports for terminal display.
pub struct HumanFormatter {
    /// Whether to use colors (ANSI escape codes).
    pub use_color: bool,
    /// Whether to list hints (skipped samples).
    pub show_hints: bool,
}

impl HumanFormatter {
    /// Create a formatter that hides hints.
    pub fn new(use_color: bool) -> Self {
        Self {
            use_color,
            show_hints: false,
        }
    }

    /// Show or hide hints.
    pub fn with_hints(mut self, show_hints: bool) -> Self {
        self.show_hints = show_hints;
        self
    }

    fn severity_prefix(&self, severity: Severity) -> String {
        let style = match severity {
            Severity::Hint => Style::new().cyan(),
            Severity::Warning => Style::new().yellow().bold(),
            Severity::Error => Style::new().red().bold(),
        };
        if self.use_color {
            style.force_styling(true).apply_to(severity).to_string()
        } else {
            severity.to_string()
        }
    }
}

impl ReportFormatter for HumanFormatter {
    fn format<W: Write>(
        &self,
        diagnostics: &[Diagnostic],
        summary: &Summary,
        writer: &mut W,
    ) -> std::io::Result<()> {
        for diag in diagnostics {
            if diag.severity == Severity::Hint && !self.show_hints {
                continue;
            }

            // error[missing-symbol]: message
            writeln!(
                writer,
                "{}[{}]: {}",
                self.severity_prefix(diag.severity),
                diag.code,
                diag.message
            )?;
            if let Some(location) = diag.location() {
                writeln!(writer, "  --> {}", location)?;
            }
            if let Some(ref suggestion) = diag.suggestion {
                writeln!(writer, "   = help: {}", suggestion)?;
            }
            writeln!(writer)?;
        }

        if summary.total() > 0 {
            writeln!(
                writer,
                "Checked {} sample(s): {} passed, {} failed, {} skipped",
                summary.total(),
                summary.passed,
                summary.failed,
                summary.skipped
            )?;
        }
        if let Some(ref fingerprint) = summary.fingerprint {
            writeln!(writer, "Fingerprint: {}", fingerprint)?;
        }

        let errors = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        let warnings = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count();
        if errors > 0 || warnings > 0 {
            writeln!(writer, "Found {} error(s) and {} warning(s)", errors, warnings)?;
        }

        Ok(())
    }
}
