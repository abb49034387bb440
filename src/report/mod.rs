//! Reporting verification results.
//!
//! Results become [`Diagnostic`]s, which the formatters in [`output`]
//! render as text, JSON, or SARIF.

pub mod diagnostic;
pub mod output;

pub use diagnostic::{diagnostics_for, Code, Diagnostic, Severity, Summary};
pub use output::{
    render, HumanFormatter, JsonFormatter, OutputFormat, ReportFormatter, SarifFormatter,
};
