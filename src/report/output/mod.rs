//! Report output formatters.
//!
//! Diagnostics can be written as human-readable text, JSON, or SARIF.

pub mod human;
pub mod json;
pub mod sarif;

use std::io::Write;

use clap::ValueEnum;

use super::{Diagnostic, Summary};

/// Output format for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Sarif,
}

/// Trait for writing a report.
pub trait ReportFormatter {
    /// Write diagnostics and the summary to `writer`.
    fn format<W: Write>(
        &self,
        diagnostics: &[Diagnostic],
        summary: &Summary,
        writer: &mut W,
    ) -> std::io::Result<()>;
}

/// Render a report with the formatter for `format`.
pub fn render(
    format: OutputFormat,
    diagnostics: &[Diagnostic],
    summary: &Summary,
    use_color: bool,
    show_hints: bool,
) -> String {
    let mut output = Vec::new();
    let written = match format {
        OutputFormat::Human => HumanFormatter::new(use_color)
            .with_hints(show_hints)
            .format(diagnostics, summary, &mut output),
        OutputFormat::Json => JsonFormatter::new().format(diagnostics, summary, &mut output),
        OutputFormat::Sarif => SarifFormatter::new("muzzle", env!("CARGO_PKG_VERSION"))
            .format(diagnostics, summary, &mut output),
    };
    if let Err(e) = written {
        tracing::warn!("Failed to render report: {}", e);
    }
    String::from_utf8_lossy(&output).into_owned()
}

pub use human::HumanFormatter;
pub use json::JsonFormatter;
pub use sarif::SarifFormatter;
