//! SARIF output formatter.
//!
//! SARIF 2.1.0 is understood by GitHub code scanning and most CI dashboards.
//! Findings carry no file location; the rule, module, and version go into
//! the result's property bag.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use super::ReportFormatter;
use crate::report::{Diagnostic, Severity, Summary};

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";

/// Formats reports as SARIF.
pub struct SarifFormatter {
    /// Tool name to report.
    pub tool_name: String,
    /// Tool version to report.
    pub tool_version: String,
}

#[derive(Serialize)]
struct SarifLog {
    #[serde(rename = "$schema")]
    schema: &'static str,
    version: &'static str,
    runs: Vec<SarifRun>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<&'static str, serde_json::Value>,
}

#[derive(Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize)]
struct SarifDriver {
    name: String,
    version: String,
    rules: Vec<SarifRule>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRule {
    id: String,
    short_description: SarifMessage,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifResult {
    rule_id: String,
    level: &'static str,
    message: SarifMessage,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<&'static str, String>,
}

#[derive(Serialize)]
struct SarifMessage {
    text: String,
}

impl SarifFormatter {
    /// Create a new SARIF formatter.
    pub fn new(tool_name: impl Into<String>, tool_version: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_version: tool_version.into(),
        }
    }

    fn level(severity: Severity) -> &'static str {
        match severity {
            Severity::Hint => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl ReportFormatter for SarifFormatter {
    fn format<W: Write>(
        &self,
        diagnostics: &[Diagnostic],
        summary: &Summary,
        writer: &mut W,
    ) -> std::io::Result<()> {
        // One rule entry per distinct code, in first-seen order.
        let mut rules: Vec<SarifRule> = Vec::new();
        for diag in diagnostics {
            if !rules.iter().any(|r| r.id == diag.code.as_str()) {
                rules.push(SarifRule {
                    id: diag.code.to_string(),
                    short_description: SarifMessage {
                        text: diag.code.description().to_string(),
                    },
                });
            }
        }

        let results = diagnostics
            .iter()
            .map(|d| {
                let properties = [("rule", &d.rule), ("module", &d.module), ("version", &d.version)]
                    .into_iter()
                    .filter_map(|(k, v)| v.clone().map(|v| (k, v)))
                    .collect();
                let text = match &d.suggestion {
                    Some(help) => format!("{} ({})", d.message, help),
                    None => d.message.clone(),
                };
                SarifResult {
                    rule_id: d.code.to_string(),
                    level: Self::level(d.severity),
                    message: SarifMessage { text },
                    properties,
                }
            })
            .collect();

        let mut properties = BTreeMap::new();
        if let Some(fingerprint) = &summary.fingerprint {
            properties.insert("fingerprint", serde_json::Value::from(fingerprint.clone()));
        }

        let log = SarifLog {
            schema: SARIF_SCHEMA,
            version: SARIF_VERSION,
            runs: vec![SarifRun {
                tool: SarifTool {
                    driver: SarifDriver {
                        name: self.tool_name.clone(),
                        version: self.tool_version.clone(),
                        rules,
                    },
                },
                results,
                properties,
            }],
        };

        serde_json::to_writer_pretty(&mut *writer, &log).map_err(std::io::Error::other)?;
        writeln!(writer)
    }
}
