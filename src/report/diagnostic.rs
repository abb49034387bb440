//! Diagnostics derived from verification results.

use std::fmt;

use serde::Serialize;

use crate::config::ValidationError;
use crate::verifier::{MatrixReport, Outcome, SkipReason, VerificationResult, Violation};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, does not affect the exit code.
    Hint,
    /// Should be looked at.
    Warning,
    /// Fails the build.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Hint => write!(f, "hint"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Kind of finding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Code {
    MissingSymbol,
    ExcludedSymbol,
    MatcherMismatch,
    UnexpectedPass,
    UnresolvedModule,
    OutOfRange,
    SkippedVersion,
    /// A configuration check, named by the validator.
    Config(String),
}

impl Code {
    pub fn as_str(&self) -> &str {
        match self {
            Self::MissingSymbol => "missing-symbol",
            Self::ExcludedSymbol => "excluded-symbol",
            Self::MatcherMismatch => "matcher-mismatch",
            Self::UnexpectedPass => "unexpected-pass",
            Self::UnresolvedModule => "unresolved-module",
            Self::OutOfRange => "out-of-range",
            Self::SkippedVersion => "skipped-version",
            Self::Config(rule) => rule,
        }
    }

    /// One-line description, used as the SARIF rule description.
    pub fn description(&self) -> &str {
        match self {
            Self::MissingSymbol => "A referenced symbol does not exist at a sampled version",
            Self::ExcludedSymbol => "A referenced symbol is only provided by an excluded artifact",
            Self::MatcherMismatch => "A class-loader matcher class is absent",
            Self::UnexpectedPass => "A version expected to fail linked cleanly",
            Self::UnresolvedModule => "The rule's module is not in the dependency set",
            Self::OutOfRange => "The resolved version is outside the rule's range",
            Self::SkippedVersion => "The version is listed in skip_versions",
            Self::Config(_) => "Configuration problem",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reported finding.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: Code,
    pub severity: Severity,
    pub message: String,
    /// Label of the rule that produced it.
    pub rule: Option<String>,
    /// `group:module` the rule targets.
    pub module: Option<String>,
    /// Sampled version.
    pub version: Option<String>,
    /// How to fix it.
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic with no rule context.
    pub fn new(code: Code, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            rule: None,
            module: None,
            version: None,
            suggestion: None,
        }
    }

    /// Attach the rule, module, and version of a result.
    pub fn for_result(mut self, result: &VerificationResult) -> Self {
        self.rule = Some(result.label.clone());
        self.module = Some(result.module.to_string());
        self.version = result.version.as_ref().map(|v| v.to_string());
        self
    }

    /// Add a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Short location string: `label (group:module version)`.
    pub fn location(&self) -> Option<String> {
        let rule = self.rule.as_ref()?;
        let target = match (&self.module, &self.version) {
            (Some(module), Some(version)) => format!("{} {}", module, version),
            (Some(module), None) => module.clone(),
            (None, Some(version)) => version.clone(),
            (None, None) => return Some(rule.clone()),
        };
        if self.module.as_deref() == Some(rule.as_str()) {
            Some(target)
        } else {
            Some(format!("{} ({})", rule, target))
        }
    }

    /// Diagnostics for one result; a pass produces none.
    pub fn from_result(result: &VerificationResult) -> Vec<Diagnostic> {
        match &result.outcome {
            Outcome::Passed => Vec::new(),
            Outcome::Failed(violations) => violations
                .iter()
                .map(|v| from_violation(v).for_result(result))
                .collect(),
            Outcome::Skipped(reason) => vec![from_skip(reason).for_result(result)],
        }
    }

    /// A configuration finding.
    pub fn from_validation(finding: &ValidationError) -> Self {
        let message = match &finding.location {
            Some(at) => format!("{}: {}", at, finding.message),
            None => finding.message.clone(),
        };
        Self::new(Code::Config(finding.rule.clone()), finding.severity, message)
    }
}

fn from_violation(violation: &Violation) -> Diagnostic {
    match violation {
        Violation::MissingSymbol {
            symbol,
            excluded_by: None,
        } => Diagnostic::new(Code::MissingSymbol, Severity::Error, violation.to_string())
            .with_suggestion(format!(
                "Narrow the rule's range or add an extra dependency that provides {}",
                symbol.owner()
            )),
        Violation::MissingSymbol {
            excluded_by: Some(by),
            ..
        } => Diagnostic::new(Code::ExcludedSymbol, Severity::Error, violation.to_string())
            .with_suggestion(format!(
                "Stop referencing it, or remove {} from the exclusions",
                by
            )),
        Violation::MatcherMismatch { .. } => {
            Diagnostic::new(Code::MatcherMismatch, Severity::Error, violation.to_string())
                .with_suggestion("Add the artifact providing the matcher class as an extra dependency")
        }
        Violation::UnexpectedPass => {
            Diagnostic::new(Code::UnexpectedPass, Severity::Error, violation.to_string())
                .with_suggestion("Use 'assert: pass' or move the range to versions that really break")
        }
    }
}

fn from_skip(reason: &SkipReason) -> Diagnostic {
    let code = match reason {
        SkipReason::UnresolvedModule => Code::UnresolvedModule,
        SkipReason::OutOfRange { .. } => Code::OutOfRange,
        SkipReason::SkippedVersion => Code::SkippedVersion,
    };
    Diagnostic::new(code, Severity::Hint, format!("skipped: {}", reason))
}

/// Diagnostics for every result, in result order.
pub fn diagnostics_for(results: &[VerificationResult]) -> Vec<Diagnostic> {
    results.iter().flat_map(Diagnostic::from_result).collect()
}

/// Counts shown at the end of every report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Present for matrix runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

impl Summary {
    pub fn from_results(results: &[VerificationResult]) -> Self {
        Self {
            passed: results.iter().filter(|r| r.is_pass()).count(),
            failed: results.iter().filter(|r| r.is_failure()).count(),
            skipped: results.iter().filter(|r| r.is_skipped()).count(),
            fingerprint: None,
        }
    }

    pub fn from_report(report: &MatrixReport) -> Self {
        Self {
            fingerprint: Some(report.fingerprint()),
            ..Self::from_results(report.results())
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolRef;
    use crate::verifier::{Assertion, RuleId};
    use crate::version::{ModuleKey, Version, VersionRange};

    fn result(label: &str, outcome: Outcome) -> VerificationResult {
        VerificationResult {
            rule: RuleId(0),
            label: label.to_string(),
            module: ModuleKey::parse("com.amazonaws:aws-lambda-java-core").unwrap(),
            version: Some(Version::parse("1.5.2").unwrap()),
            expectation: Assertion::Pass,
            outcome,
        }
    }

    #[test]
    fn passes_produce_nothing() {
        assert!(Diagnostic::from_result(&result("core", Outcome::Passed)).is_empty());
    }

    #[test]
    fn missing_symbol_is_an_error_with_context() {
        let failed = result(
            "core",
            Outcome::Failed(vec![Violation::MissingSymbol {
                symbol: SymbolRef::parse("com.amazonaws.serverless.proxy.model.HttpApiV2ProxyRequest")
                    .unwrap(),
                excluded_by: None,
            }]),
        );
        let diags = Diagnostic::from_result(&failed);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, Code::MissingSymbol);
        assert_eq!(diags[0].severity, Severity::Error);
        assert_eq!(diags[0].version.as_deref(), Some("1.5.2"));
        assert!(diags[0].message.contains("HttpApiV2ProxyRequest"));
        assert!(diags[0].suggestion.is_some());
    }

    #[test]
    fn excluded_symbol_has_own_code() {
        let failed = result(
            "events",
            Outcome::Failed(vec![Violation::MissingSymbol {
                symbol: SymbolRef::parse("com.fasterxml.jackson.databind.ObjectMapper").unwrap(),
                excluded_by: Some(ModuleKey::parse("com.fasterxml.jackson.core:jackson-databind").unwrap()),
            }]),
        );
        assert_eq!(Diagnostic::from_result(&failed)[0].code, Code::ExcludedSymbol);
    }

    #[test]
    fn skips_are_hints() {
        let skipped = result(
            "events",
            Outcome::Skipped(SkipReason::OutOfRange {
                range: VersionRange::parse("[3.3.1,)").unwrap(),
            }),
        );
        let diags = Diagnostic::from_result(&skipped);
        assert_eq!(diags[0].code.as_str(), "out-of-range");
        assert_eq!(diags[0].severity, Severity::Hint);
        assert!(diags[0].message.contains("[3.3.1,)"));
    }

    #[test]
    fn location_names_rule_module_and_version() {
        let diag = Diagnostic::new(Code::MissingSymbol, Severity::Error, "x")
            .for_result(&result("core", Outcome::Passed));
        assert_eq!(
            diag.location().unwrap(),
            "core (com.amazonaws:aws-lambda-java-core 1.5.2)"
        );

        let unnamed = Diagnostic::new(Code::MissingSymbol, Severity::Error, "x")
            .for_result(&result("com.amazonaws:aws-lambda-java-core", Outcome::Passed));
        assert_eq!(unnamed.location().unwrap(), "com.amazonaws:aws-lambda-java-core 1.5.2");
    }

    #[test]
    fn summary_counts_results() {
        let results = vec![
            result("a", Outcome::Passed),
            result("b", Outcome::Skipped(SkipReason::UnresolvedModule)),
        ];
        let summary = Summary::from_results(&results);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total(), 2);
        assert!(summary.fingerprint.is_none());
    }

    #[test]
    fn severity_orders_by_importance() {
        assert!(Severity::Hint < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }
}
