//! The compatibility range verifier.

use std::collections::BTreeSet;
use std::thread;

use tracing::{debug, info, warn};

use crate::config::MuzzleConfig;
use crate::error::{MuzzleError, Result};
use crate::symbols::{Catalog, Classpath, Lookup, SymbolRef, SymbolSurface};
use crate::version::{ModuleKey, Version};

use super::dependency_set::DependencySet;
use super::result::{MatrixReport, Outcome, SkipReason, VerificationResult, Violation};
use super::rule::{Assertion, CompatibilityRule, RuleId};
use super::sampling::{sample_in_range, sample_outside_range, CandidateVersions};

/// Checks registered rules against dependency sets.
///
/// Rules are evaluated independently. With `max_parallel > 1` they are
/// spread over scoped worker threads; results always come back in
/// registration order.
#[derive(Debug, Clone)]
pub struct Verifier {
    surface: SymbolSurface,
    catalog: Catalog,
    exclusions: BTreeSet<ModuleKey>,
    rules: Vec<CompatibilityRule>,
    max_parallel: usize,
}

impl Verifier {
    /// Create a verifier with no rules.
    pub fn new(surface: SymbolSurface, catalog: Catalog) -> Self {
        Self {
            surface,
            catalog,
            exclusions: BTreeSet::new(),
            rules: Vec::new(),
            max_parallel: 1,
        }
    }

    /// Build a verifier from a loaded configuration, registering every rule.
    pub fn from_config(config: &MuzzleConfig) -> Result<Self> {
        let mut verifier = Self::new(config.instrumentation.surface()?, config.catalog()?);
        for key in config.instrumentation.exclusion_keys()? {
            verifier = verifier.with_exclusion(key);
        }
        if config.settings.parallel {
            verifier = verifier.with_max_parallel(config.settings.max_parallel);
        }
        for rule in &config.rules {
            verifier.register(rule.to_rule()?)?;
        }
        Ok(verifier)
    }

    /// Exclude an artifact for every rule.
    pub fn with_exclusion(mut self, key: ModuleKey) -> Self {
        self.exclusions.insert(key);
        self
    }

    /// Evaluate rules on up to `max_parallel` threads.
    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel.max(1);
        self
    }

    /// Parse and register a `pass` rule.
    pub fn register_rule(
        &mut self,
        group: &str,
        module: &str,
        versions: &str,
        extra_dependencies: &[&str],
    ) -> Result<RuleId> {
        let rule = CompatibilityRule::parse(group, module, versions, extra_dependencies)?;
        self.register(rule)
    }

    /// Register a prebuilt rule.
    pub fn register(&mut self, rule: CompatibilityRule) -> Result<RuleId> {
        if self.rules.contains(&rule) {
            return Err(MuzzleError::ConfigValidationError {
                message: format!("duplicate rule: {}", rule),
            });
        }
        if rule.excluded_dependencies().contains(rule.key()) || self.exclusions.contains(rule.key()) {
            return Err(MuzzleError::ConfigValidationError {
                message: format!("rule {} excludes its own module", rule),
            });
        }
        if !self.catalog.contains(rule.key()) {
            warn!("{} is not in the catalog; none of its symbols will resolve", rule.key());
        }

        let id = RuleId(self.rules.len());
        debug!("Registered rule {} {}", id, rule);
        self.rules.push(rule);
        Ok(id)
    }

    /// Registered rules in registration order.
    pub fn rules(&self) -> &[CompatibilityRule] {
        &self.rules
    }

    pub fn surface(&self) -> &SymbolSurface {
        &self.surface
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Evaluate every rule against `dependencies`.
    pub fn verify(&self, dependencies: &DependencySet) -> Vec<VerificationResult> {
        self.map_rules(|id, rule| self.evaluate(id, rule, dependencies))
    }

    /// Evaluate one rule against `dependencies`.
    pub fn verify_rule(&self, id: RuleId, dependencies: &DependencySet) -> Option<VerificationResult> {
        self.rules
            .get(id.0)
            .map(|rule| self.evaluate(id, rule, dependencies))
    }

    /// Sample every rule's range and verify each sample.
    ///
    /// Fails with `CompatibilityViolation` when any sample failed.
    pub fn verify_across_matrix(&self, candidates: &CandidateVersions) -> Result<MatrixReport> {
        self.run_matrix(candidates).into_result()
    }

    /// Like [`Verifier::verify_across_matrix`], but always returns the report.
    pub fn run_matrix(&self, candidates: &CandidateVersions) -> MatrixReport {
        self.run_matrix_with(candidates, |_| {})
    }

    /// Run the matrix, calling `on_rule_done` as each rule finishes.
    pub fn run_matrix_with<F>(&self, candidates: &CandidateVersions, on_rule_done: F) -> MatrixReport
    where
        F: Fn(RuleId) + Sync,
    {
        let per_rule = self.map_rules(|id, rule| {
            let results = self.matrix_for_rule(id, rule, candidates);
            on_rule_done(id);
            results
        });
        let report = MatrixReport::new(per_rule.into_iter().flatten().collect());
        info!(
            "Matrix finished: {} passed, {} failed, {} skipped",
            report.passed(),
            report.failed(),
            report.skipped()
        );
        report
    }

    fn matrix_for_rule(
        &self,
        id: RuleId,
        rule: &CompatibilityRule,
        candidates: &CandidateVersions,
    ) -> Vec<VerificationResult> {
        let known: Vec<&Version> = self
            .catalog
            .releases(rule.key())
            .iter()
            .chain(candidates.get(rule.key()))
            .collect();

        let samples = sample_in_range(rule, known.iter().copied());
        if samples.is_empty() {
            warn!("No versions to sample for rule {} {}", id, rule);
        }

        let mut results: Vec<VerificationResult> = samples
            .into_iter()
            .map(|version| {
                let deps = DependencySet::single(rule.key().clone(), version);
                self.evaluate(id, rule, &deps)
            })
            .collect();

        if rule.assert_inverse() {
            for version in sample_outside_range(rule, known.iter().copied()) {
                let deps = DependencySet::single(rule.key().clone(), version.clone());
                results.push(self.check(id, rule, version, &deps, rule.assertion().inverted()));
            }
        }

        results.sort_by(|a, b| a.version.cmp(&b.version));
        results
    }

    fn evaluate(
        &self,
        id: RuleId,
        rule: &CompatibilityRule,
        dependencies: &DependencySet,
    ) -> VerificationResult {
        let version = match dependencies.require(rule.key()) {
            Ok(version) => version.clone(),
            Err(err) => {
                debug!("Skipping rule {}: {}", id, err);
                return skipped(id, rule, None, SkipReason::UnresolvedModule);
            }
        };

        if !rule.versions().contains(&version) {
            debug!("Skipping rule {}: {} is outside {}", id, version, rule.versions());
            let reason = SkipReason::OutOfRange {
                range: rule.versions().clone(),
            };
            return skipped(id, rule, Some(version), reason);
        }
        if rule.skips(&version) {
            debug!("Skipping rule {}: {} is listed in skip_versions", id, version);
            return skipped(id, rule, Some(version), SkipReason::SkippedVersion);
        }

        self.check(id, rule, version, dependencies, rule.assertion())
    }

    fn check(
        &self,
        id: RuleId,
        rule: &CompatibilityRule,
        version: Version,
        dependencies: &DependencySet,
        expectation: Assertion,
    ) -> VerificationResult {
        let mut exclusions = self.exclusions.clone();
        exclusions.extend(rule.excluded_dependencies().iter().cloned());
        let classpath = Classpath::build(
            &self.catalog,
            dependencies,
            rule.extra_dependencies(),
            &exclusions,
        );

        let mut violations = Vec::new();
        for class in &self.surface.class_loader_matcher {
            let symbol = SymbolRef::Class(class.clone());
            if !matches!(classpath.lookup(&self.catalog, &symbol), Lookup::Found { .. }) {
                violations.push(Violation::MatcherMismatch {
                    class: class.clone(),
                });
            }
        }
        for symbol in self.surface.checked_references() {
            let excluded_by = match classpath.resolves(&self.catalog, symbol) {
                Lookup::Found { .. } => continue,
                Lookup::Excluded { by } => Some(by),
                Lookup::Missing => None,
            };
            violations.push(Violation::MissingSymbol {
                symbol: symbol.clone(),
                excluded_by,
            });
        }

        debug!(
            "Rule {} at {}: {} violation(s) on a classpath of {} artifact(s), expecting {}",
            id,
            version,
            violations.len(),
            classpath.len(),
            expectation
        );

        let outcome = match (expectation, violations.is_empty()) {
            (Assertion::Pass, true) | (Assertion::Fail, false) => Outcome::Passed,
            (Assertion::Pass, false) => Outcome::Failed(violations),
            (Assertion::Fail, true) => Outcome::Failed(vec![Violation::UnexpectedPass]),
        };

        VerificationResult {
            rule: id,
            label: rule.label(),
            module: rule.key().clone(),
            version: Some(version),
            expectation,
            outcome,
        }
    }

    fn map_rules<T, F>(&self, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(RuleId, &CompatibilityRule) -> T + Sync,
    {
        let workers = self.max_parallel.min(self.rules.len());
        if workers <= 1 {
            return self
                .rules
                .iter()
                .enumerate()
                .map(|(i, rule)| f(RuleId(i), rule))
                .collect();
        }

        let chunk_size = self.rules.len().div_ceil(workers);
        debug!("Evaluating {} rules on {} threads", self.rules.len(), workers);
        thread::scope(|scope| {
            let f = &f;
            let handles: Vec<_> = self
                .rules
                .chunks(chunk_size)
                .enumerate()
                .map(|(n, chunk)| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .enumerate()
                            .map(|(i, rule)| f(RuleId(n * chunk_size + i), rule))
                            .collect::<Vec<T>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        })
    }
}

fn skipped(
    id: RuleId,
    rule: &CompatibilityRule,
    version: Option<Version>,
    reason: SkipReason,
) -> VerificationResult {
    VerificationResult {
        rule: id,
        label: rule.label(),
        module: rule.key().clone(),
        version,
        expectation: rule.assertion(),
        outcome: Outcome::Skipped(reason),
    }
}
