//! Verification outcomes and matrix reports.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::error::{MuzzleError, Result};
use crate::symbols::SymbolRef;
use crate::version::{ModuleKey, Version, VersionRange};

use super::rule::{Assertion, RuleId};

/// Why a sample did not satisfy its rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A referenced symbol does not resolve.
    MissingSymbol {
        symbol: SymbolRef,
        /// Set when an excluded artifact would have provided the symbol.
        excluded_by: Option<ModuleKey>,
    },
    /// A class-loader matcher class is absent, so the module would never apply.
    MatcherMismatch { class: String },
    /// A `fail` expectation saw every symbol resolve.
    UnexpectedPass,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSymbol {
                symbol,
                excluded_by: None,
            } => write!(f, "missing {} {}", symbol.kind(), symbol),
            Self::MissingSymbol {
                symbol,
                excluded_by: Some(by),
            } => write!(
                f,
                "missing {} {} (only provided by excluded {})",
                symbol.kind(),
                symbol,
                by
            ),
            Self::MatcherMismatch { class } => {
                write!(f, "class-loader matcher class {} is absent", class)
            }
            Self::UnexpectedPass => write!(f, "expected a failure but every symbol resolved"),
        }
    }
}

/// Why a rule was not evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The module is not in the dependency set.
    UnresolvedModule,
    /// The resolved version lies outside the rule's range.
    OutOfRange { range: VersionRange },
    /// The version is listed in the rule's `skip_versions`.
    SkippedVersion,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedModule => write!(f, "module not in dependency set"),
            Self::OutOfRange { range } => write!(f, "outside {}", range),
            Self::SkippedVersion => write!(f, "version skipped by rule"),
        }
    }
}

/// Outcome of evaluating one rule at one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed(Vec<Violation>),
    Skipped(SkipReason),
}

/// Result of evaluating one rule against one dependency set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    /// Which rule produced this result.
    pub rule: RuleId,
    /// Rule label for display.
    pub label: String,
    /// Module the rule targets.
    pub module: ModuleKey,
    /// Version evaluated, absent when the module was unresolved.
    pub version: Option<Version>,
    /// Expectation applied to this sample.
    pub expectation: Assertion,
    pub outcome: Outcome,
}

impl VerificationResult {
    pub fn is_pass(&self) -> bool {
        matches!(self.outcome, Outcome::Passed)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, Outcome::Skipped(_))
    }

    /// Violations, empty unless failed.
    pub fn violations(&self) -> &[Violation] {
        match &self.outcome {
            Outcome::Failed(violations) => violations,
            _ => &[],
        }
    }

    /// Turn the first missing symbol into a `MissingSymbol` error.
    pub fn into_result(self) -> Result<Self> {
        let missing = self.violations().iter().find_map(|v| match v {
            Violation::MissingSymbol { symbol, .. } => Some(symbol.to_string()),
            Violation::MatcherMismatch { class } => Some(class.clone()),
            Violation::UnexpectedPass => None,
        });
        match missing {
            Some(symbol) => Err(MuzzleError::MissingSymbol {
                symbol,
                module: self.module.to_string(),
                version: self.version_label(),
            }),
            None => Ok(self),
        }
    }

    /// The sampled version, or `-` when there is none.
    pub fn version_label(&self) -> String {
        self.version
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    /// Short status word.
    pub fn status(&self) -> &'static str {
        match self.outcome {
            Outcome::Passed => "pass",
            Outcome::Failed(_) => "fail",
            Outcome::Skipped(_) => "skip",
        }
    }

    /// Stable single-line rendering used for fingerprints.
    pub fn canonical_line(&self) -> String {
        let detail = match &self.outcome {
            Outcome::Passed => String::new(),
            Outcome::Failed(violations) => violations
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(";"),
            Outcome::Skipped(reason) => reason.to_string(),
        };
        format!(
            "{}|{}|{}|{}|{}|{}|{}",
            self.rule.0,
            self.label,
            self.module,
            self.version_label(),
            self.expectation,
            self.status(),
            detail
        )
    }
}

/// Aggregated results of a matrix run, in rule then version order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixReport {
    results: Vec<VerificationResult>,
}

impl MatrixReport {
    pub fn new(results: Vec<VerificationResult>) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &[VerificationResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<VerificationResult> {
        self.results
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.is_pass()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    pub fn skipped(&self) -> usize {
        self.results.iter().filter(|r| r.is_skipped()).count()
    }

    /// Whether no sample failed.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// SHA-256 over the canonical result lines, hex encoded.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for result in &self.results {
            hasher.update(result.canonical_line().as_bytes());
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }

    /// The report itself, or `CompatibilityViolation` when any sample failed.
    pub fn into_result(self) -> Result<Self> {
        let failures = self.failed();
        if failures == 0 {
            Ok(self)
        } else {
            Err(MuzzleError::CompatibilityViolation {
                failures,
                report: Box::new(self),
            })
        }
    }
}
