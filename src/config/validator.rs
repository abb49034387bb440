//! Configuration validation.
//!
//! Every problem is collected rather than stopping at the first, so one
//! run shows everything that needs fixing. Gaps in the catalog are only
//! warnings: verification still runs and reports the missing symbols.

use std::collections::{BTreeSet, HashSet};

use crate::config::schema::MuzzleConfig;
use crate::error::{MuzzleError, Result};
use crate::report::Severity;
use crate::symbols::SymbolRef;
use crate::version::{Coordinate, ModuleKey, Version, VersionRange};

/// A validation finding with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Check identifier
    pub rule: String,
    /// Human-readable message
    pub message: String,
    /// Error or warning
    pub severity: Severity,
    /// Where in the config the problem is, e.g. `rules[1]`
    pub location: Option<String>,
}

impl ValidationError {
    fn error(rule: &str, location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
            severity: Severity::Error,
            location: Some(location.into()),
        }
    }

    fn warning(rule: &str, location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(rule, location, message)
        }
    }

    /// Whether this finding blocks verification.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Validate a configuration and return every finding.
pub fn validate_config(config: &MuzzleConfig) -> Vec<ValidationError> {
    let mut findings = Vec::new();
    let cataloged = validate_catalog(config, &mut findings);
    validate_instrumentation(config, &cataloged, &mut findings);
    validate_rules(config, &cataloged, &mut findings);
    validate_resolved(config, &mut findings);
    findings
}

/// Validate the catalog, returning the artifacts it declares.
fn validate_catalog(config: &MuzzleConfig, findings: &mut Vec<ValidationError>) -> BTreeSet<ModuleKey> {
    let mut seen = BTreeSet::new();

    for (i, entry) in config.catalog.iter().enumerate() {
        let at = format!("catalog[{}]", i);
        match ModuleKey::parse(&entry.artifact) {
            Ok(key) => {
                if !seen.insert(key.clone()) {
                    findings.push(ValidationError::error(
                        "duplicate-artifact",
                        &at,
                        format!("Artifact '{}' is declared more than once", key),
                    ));
                }
            }
            Err(e) => findings.push(ValidationError::error("invalid-module", &at, e.to_string())),
        }

        for release in &entry.releases {
            check_version(release, &at, findings);
        }
        for dep in &entry.dependencies {
            if let Err(e) = Coordinate::parse(dep) {
                findings.push(ValidationError::error("invalid-coordinate", &at, e.to_string()));
            }
        }
        for symbol in &entry.symbols {
            if let Err(e) = SymbolRef::parse(&symbol.symbol) {
                findings.push(ValidationError::error("invalid-symbol", &at, e.to_string()));
            }
            let since = symbol.since.as_deref().and_then(|v| check_version(v, &at, findings));
            let until = symbol.until.as_deref().and_then(|v| check_version(v, &at, findings));
            if let (Some(since), Some(until)) = (since, until) {
                if since >= until {
                    findings.push(ValidationError::error(
                        "empty-symbol-window",
                        &at,
                        format!(
                            "Symbol '{}' has since {} not before until {}",
                            symbol.symbol, since, until
                        ),
                    ));
                }
            }
        }
    }

    seen
}

fn validate_instrumentation(
    config: &MuzzleConfig,
    cataloged: &BTreeSet<ModuleKey>,
    findings: &mut Vec<ValidationError>,
) {
    let instrumentation = &config.instrumentation;
    let owners = catalog_owners(config);

    for reference in &instrumentation.references {
        let symbol = match SymbolRef::parse(reference) {
            Ok(symbol) => symbol,
            Err(e) => {
                findings.push(ValidationError::error(
                    "invalid-symbol",
                    "instrumentation.references",
                    e.to_string(),
                ));
                continue;
            }
        };
        let skipped = instrumentation
            .helper_prefixes
            .iter()
            .chain(instrumentation.bootstrap_prefixes.iter().flatten())
            .any(|p| symbol.owner().starts_with(p.as_str()))
            || (instrumentation.bootstrap_prefixes.is_none()
                && crate::symbols::DEFAULT_BOOTSTRAP_PREFIXES
                    .iter()
                    .any(|p| symbol.owner().starts_with(p)));
        if !skipped && !owners.contains(symbol.owner()) {
            findings.push(ValidationError::warning(
                "unknown-reference",
                "instrumentation.references",
                format!("No catalog artifact provides class '{}'", symbol.owner()),
            ));
        }
    }

    for class in &instrumentation.class_loader_matcher {
        match SymbolRef::parse(class) {
            Ok(SymbolRef::Class(_)) => {}
            Ok(other) => findings.push(ValidationError::error(
                "invalid-symbol",
                "instrumentation.class_loader_matcher",
                format!("'{}' is a {}, expected a class", other, other.kind()),
            )),
            Err(e) => findings.push(ValidationError::error(
                "invalid-symbol",
                "instrumentation.class_loader_matcher",
                e.to_string(),
            )),
        }
    }

    for exclusion in &instrumentation.exclusions {
        if let Err(e) = ModuleKey::parse(exclusion) {
            findings.push(ValidationError::error(
                "invalid-module",
                "instrumentation.exclusions",
                e.to_string(),
            ));
        }
    }

    if cataloged.is_empty() && !instrumentation.references.is_empty() {
        findings.push(ValidationError::warning(
            "empty-catalog",
            "catalog",
            "The catalog is empty; every referenced symbol will be missing",
        ));
    }
}

fn validate_rules(
    config: &MuzzleConfig,
    cataloged: &BTreeSet<ModuleKey>,
    findings: &mut Vec<ValidationError>,
) {
    if config.rules.is_empty() {
        findings.push(ValidationError::error(
            "no-rules",
            "rules",
            "At least one rule is required",
        ));
    }

    let global_exclusions: HashSet<ModuleKey> = config
        .instrumentation
        .exclusions
        .iter()
        .filter_map(|e| ModuleKey::parse(e).ok())
        .collect();
    let mut declared = Vec::new();

    for (i, rule) in config.rules.iter().enumerate() {
        let at = format!("rules[{}]", i);

        match ModuleKey::new(&rule.group, &rule.module) {
            Ok(key) => {
                if !cataloged.is_empty() && !cataloged.contains(&key) {
                    findings.push(ValidationError::warning(
                        "uncataloged-module",
                        &at,
                        format!("Module '{}' is not in the catalog", key),
                    ));
                }
                if global_exclusions.contains(&key)
                    || rule
                        .excluded_dependencies
                        .iter()
                        .any(|e| ModuleKey::parse(e).is_ok_and(|e| e == key))
                {
                    findings.push(ValidationError::error(
                        "self-exclusion",
                        &at,
                        format!("Rule for '{}' excludes its own module", key),
                    ));
                }
            }
            Err(e) => findings.push(ValidationError::error("invalid-module", &at, e.to_string())),
        }

        if let Err(e) = VersionRange::parse(&rule.versions) {
            findings.push(ValidationError::error("malformed-range", &at, e.to_string()));
        }
        for extra in &rule.extra_dependencies {
            if let Err(e) = Coordinate::parse(extra) {
                findings.push(ValidationError::error("invalid-coordinate", &at, e.to_string()));
            }
        }
        for excluded in &rule.excluded_dependencies {
            if let Err(e) = ModuleKey::parse(excluded) {
                findings.push(ValidationError::error("invalid-module", &at, e.to_string()));
            }
        }
        for version in &rule.skip_versions {
            check_version(version, &at, findings);
        }

        if let Ok(parsed) = rule.to_rule() {
            if declared.contains(&parsed) {
                findings.push(ValidationError::error(
                    "duplicate-rule",
                    &at,
                    format!("Rule '{}' is declared more than once", parsed),
                ));
            } else {
                declared.push(parsed);
            }
        }
    }
}

fn validate_resolved(config: &MuzzleConfig, findings: &mut Vec<ValidationError>) {
    for (key, version) in &config.resolved {
        let at = format!("resolved.{}", key);
        if let Err(e) = ModuleKey::parse(key) {
            findings.push(ValidationError::error("invalid-module", &at, e.to_string()));
        }
        check_version(version, &at, findings);
    }
}

fn check_version(value: &str, at: &str, findings: &mut Vec<ValidationError>) -> Option<Version> {
    match Version::parse(value) {
        Ok(version) => Some(version),
        Err(e) => {
            findings.push(ValidationError::error("invalid-version", at, e.to_string()));
            None
        }
    }
}

/// Classes provided by any catalog artifact at any version.
fn catalog_owners(config: &MuzzleConfig) -> HashSet<String> {
    config
        .catalog
        .iter()
        .flat_map(|entry| &entry.symbols)
        .filter_map(|s| SymbolRef::parse(&s.symbol).ok())
        .map(|s| s.owner().to_string())
        .collect()
}

/// Validate and fail on the first batch of errors. Warnings pass.
///
/// # Errors
///
/// Returns `ConfigValidationError` listing every error found.
pub fn validate(config: &MuzzleConfig) -> Result<()> {
    let messages: Vec<String> = validate_config(config)
        .into_iter()
        .filter(ValidationError::is_error)
        .map(|e| match e.location {
            Some(at) => format!("{}: {}", at, e.message),
            None => e.message,
        })
        .collect();

    if messages.is_empty() {
        Ok(())
    } else {
        Err(MuzzleError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{CatalogEntry, CatalogSymbol, RuleConfig};

    fn rule(group: &str, module: &str, versions: &str) -> RuleConfig {
        RuleConfig {
            group: group.to_string(),
            module: module.to_string(),
            versions: versions.to_string(),
            ..Default::default()
        }
    }

    fn valid_config() -> MuzzleConfig {
        let mut config = MuzzleConfig::default();
        config.instrumentation.references =
            vec!["com.amazonaws.services.lambda.runtime.Context".to_string()];
        config.rules.push(rule("com.amazonaws", "aws-lambda-java-core", "[1.0.0,)"));
        config.catalog.push(CatalogEntry {
            artifact: "com.amazonaws:aws-lambda-java-core".to_string(),
            releases: vec!["1.0.0".to_string(), "1.2.1".to_string()],
            dependencies: vec![],
            symbols: vec![CatalogSymbol {
                symbol: "com.amazonaws.services.lambda.runtime.Context".to_string(),
                since: None,
                until: None,
            }],
        });
        config
    }

    fn rules_of(findings: &[ValidationError]) -> Vec<&str> {
        findings.iter().map(|f| f.rule.as_str()).collect()
    }

    #[test]
    fn valid_config_has_no_findings() {
        let findings = validate_config(&valid_config());
        assert!(findings.is_empty(), "{:?}", findings);
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn reports_malformed_range() {
        let mut config = valid_config();
        config.rules[0].versions = "[2.0,1.0]".to_string();
        let findings = validate_config(&config);
        assert!(rules_of(&findings).contains(&"malformed-range"));
        assert!(validate(&config).is_err());
    }

    #[test]
    fn requires_rules() {
        let mut config = valid_config();
        config.rules.clear();
        assert!(rules_of(&validate_config(&config)).contains(&"no-rules"));
    }

    #[test]
    fn reports_self_exclusion() {
        let mut config = valid_config();
        config.rules[0].excluded_dependencies = vec!["com.amazonaws:aws-lambda-java-core".to_string()];
        assert!(rules_of(&validate_config(&config)).contains(&"self-exclusion"));
    }

    #[test]
    fn self_exclusion_ignores_surrounding_whitespace() {
        let mut config = valid_config();
        config.rules[0].excluded_dependencies = vec![" com.amazonaws:aws-lambda-java-core".to_string()];
        assert!(rules_of(&validate_config(&config)).contains(&"self-exclusion"));
        assert!(crate::verifier::Verifier::from_config(&config).is_err());

        let mut config = valid_config();
        config.instrumentation.exclusions = vec!["com.amazonaws:aws-lambda-java-core ".to_string()];
        assert!(rules_of(&validate_config(&config)).contains(&"self-exclusion"));
        assert!(validate(&config).is_err());
        assert!(crate::verifier::Verifier::from_config(&config).is_err());
    }

    #[test]
    fn reports_duplicate_rules_and_artifacts() {
        let mut config = valid_config();
        config.rules.push(rule("com.amazonaws", "aws-lambda-java-core", "[1.0.0,)"));
        config.catalog.push(config.catalog[0].clone());
        let findings = validate_config(&config);
        assert!(rules_of(&findings).contains(&"duplicate-rule"));
        assert!(rules_of(&findings).contains(&"duplicate-artifact"));
    }

    #[test]
    fn reports_empty_symbol_window() {
        let mut config = valid_config();
        config.catalog[0].symbols[0].since = Some("2.0".to_string());
        config.catalog[0].symbols[0].until = Some("2.0.0".to_string());
        assert!(rules_of(&validate_config(&config)).contains(&"empty-symbol-window"));
    }

    #[test]
    fn reports_bad_coordinates_symbols_and_versions() {
        let mut config = valid_config();
        config.rules[0].extra_dependencies = vec!["com.amazonaws:missing-version".to_string()];
        config.rules[0].skip_versions = vec!["x.y".to_string()];
        config.instrumentation.references.push("com..Broken".to_string());
        config.instrumentation.class_loader_matcher = vec!["com.example.Foo#bar()".to_string()];
        config.resolved.insert("not-a-key".to_string(), "1.0".to_string());

        let findings = validate_config(&config);
        let rules = rules_of(&findings);
        assert!(rules.contains(&"invalid-coordinate"));
        assert!(rules.contains(&"invalid-version"));
        assert!(rules.contains(&"invalid-symbol"));
        assert!(rules.contains(&"invalid-module"));
    }

    #[test]
    fn catalog_gaps_are_warnings() {
        let mut config = valid_config();
        config.rules.push(rule("com.amazonaws", "aws-lambda-java-events", "[3.3.1,)"));
        config
            .instrumentation
            .references
            .push("com.amazonaws.services.lambda.runtime.events.SQSEvent".to_string());

        let findings = validate_config(&config);
        assert!(findings.iter().all(|f| f.severity == Severity::Warning));
        assert!(rules_of(&findings).contains(&"uncataloged-module"));
        assert!(rules_of(&findings).contains(&"unknown-reference"));
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn bootstrap_and_helper_references_need_no_catalog_entry() {
        let mut config = valid_config();
        config.instrumentation.references.push("java.util.Map".to_string());
        config.instrumentation.helper_prefixes = vec!["com.fasterxml.jackson.".to_string()];
        config
            .instrumentation
            .references
            .push("com.fasterxml.jackson.databind.ObjectMapper".to_string());
        assert!(validate_config(&config).is_empty());
    }
}
