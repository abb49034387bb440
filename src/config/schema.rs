//! Configuration schema definitions for muzzle.
//!
//! These structs map to the YAML configuration file format. Values stay as
//! strings here; the `to_*` conversions parse them into domain types.

use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::symbols::{Artifact, Catalog, SymbolEntry, SymbolRef, SymbolSurface};
use crate::verifier::{Assertion, CompatibilityRule, DependencySet};
use crate::version::{Coordinate, ModuleKey, Version, VersionRange};

/// Root configuration structure for `.muzzle/config.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MuzzleConfig {
    /// Project name (for display purposes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Global settings
    pub settings: Settings,

    /// What the instrumentation code references
    pub instrumentation: InstrumentationConfig,

    /// Compatibility rules, evaluated in declaration order
    #[serde(default)]
    pub rules: Vec<RuleConfig>,

    /// Declared API surfaces of libraries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub catalog: Vec<CatalogEntry>,

    /// Resolved dependency graph (`group:module` to version)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resolved: BTreeMap<String, String>,
}

/// Global settings
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Settings {
    /// Default output mode: verbose, normal, quiet, silent
    pub default_output: OutputMode,

    /// Evaluate rules on worker threads
    #[serde(default, skip_serializing_if = "is_false")]
    pub parallel: bool,

    /// Maximum concurrent rule evaluations
    #[serde(
        default = "default_max_parallel",
        skip_serializing_if = "is_default_max_parallel"
    )]
    pub max_parallel: usize,

    /// Maven repository used by `matrix --fetch`
    #[serde(
        default = "default_repository_url",
        skip_serializing_if = "is_default_repository_url"
    )]
    pub repository_url: String,

    /// How long fetched version listings stay fresh
    #[serde(
        default = "default_cache_ttl_secs",
        skip_serializing_if = "is_default_cache_ttl_secs"
    )]
    pub cache_ttl_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_output: OutputMode::default(),
            parallel: false,
            max_parallel: default_max_parallel(),
            repository_url: default_repository_url(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_max_parallel() -> usize {
    4
}

fn is_default_max_parallel(v: &usize) -> bool {
    *v == default_max_parallel()
}

/// Maven Central.
pub const DEFAULT_REPOSITORY_URL: &str = "https://repo1.maven.org/maven2";

fn default_repository_url() -> String {
    DEFAULT_REPOSITORY_URL.to_string()
}

fn is_default_repository_url(v: &String) -> bool {
    v == DEFAULT_REPOSITORY_URL
}

fn default_cache_ttl_secs() -> u64 {
    86_400
}

fn is_default_cache_ttl_secs(v: &u64) -> bool {
    *v == default_cache_ttl_secs()
}

fn is_false(v: &bool) -> bool {
    !v
}

/// Output verbosity mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Verbose,
    #[default]
    Normal,
    Quiet,
    Silent,
}

/// The symbol surface of the instrumentation module
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct InstrumentationConfig {
    /// Package prefixes of classes the agent injects itself
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub helper_prefixes: Vec<String>,

    /// Package prefixes that are always resolvable (defaults to `java.` and `javax.`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap_prefixes: Option<Vec<String>>,

    /// Classes that must be present for the instrumentation to apply
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub class_loader_matcher: Vec<String>,

    /// Artifacts kept off the classpath for every rule
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<String>,

    /// Referenced symbols: `Class`, `Class#method(params)`, or `Class#field`
    pub references: Vec<String>,
}

impl InstrumentationConfig {
    /// Parse into a [`SymbolSurface`].
    pub fn surface(&self) -> Result<SymbolSurface> {
        let references = self
            .references
            .iter()
            .map(|s| SymbolRef::parse(s))
            .collect::<Result<Vec<_>>>()?;
        let mut surface = SymbolSurface::new(references);
        if let Some(prefixes) = &self.bootstrap_prefixes {
            surface.bootstrap_prefixes = prefixes.clone();
        }
        for prefix in &self.helper_prefixes {
            surface = surface.with_helper_prefix(prefix.clone());
        }
        for class in &self.class_loader_matcher {
            match SymbolRef::parse(class)? {
                SymbolRef::Class(name) => surface = surface.with_matcher_class(name),
                other => {
                    return Err(crate::error::MuzzleError::InvalidSymbol {
                        value: other.to_string(),
                        reason: "class-loader matcher entries must be classes".to_string(),
                    })
                }
            }
        }
        Ok(surface)
    }

    /// Parse the global exclusions.
    pub fn exclusion_keys(&self) -> Result<BTreeSet<ModuleKey>> {
        self.exclusions.iter().map(|s| ModuleKey::parse(s)).collect()
    }
}

/// A compatibility rule
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RuleConfig {
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Maven group id
    pub group: String,

    /// Maven artifact id
    pub module: String,

    /// Supported versions in Maven range notation, e.g. `[1.0.0,)`
    pub versions: String,

    /// Artifacts (`group:module:version`) added to the classpath
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_dependencies: Vec<String>,

    /// Artifacts (`group:module`) kept off the classpath
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excluded_dependencies: Vec<String>,

    /// Whether versions in range must pass or fail
    #[serde(rename = "assert")]
    pub assertion: Assertion,

    /// Also check known versions outside the range with the opposite expectation
    #[serde(skip_serializing_if = "is_false")]
    pub assert_inverse: bool,

    /// Versions never evaluated
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skip_versions: Vec<String>,
}

impl RuleConfig {
    /// `group:module` for display.
    pub fn module_key(&self) -> String {
        format!("{}:{}", self.group, self.module)
    }

    /// Parse into a [`CompatibilityRule`].
    pub fn to_rule(&self) -> Result<CompatibilityRule> {
        let mut rule = CompatibilityRule::new(
            ModuleKey::new(&self.group, &self.module)?,
            VersionRange::parse(&self.versions)?,
        )
        .with_assertion(self.assertion)
        .with_assert_inverse(self.assert_inverse);

        if let Some(name) = &self.name {
            rule = rule.with_name(name.clone());
        }
        for extra in &self.extra_dependencies {
            rule = rule.with_extra_dependency(Coordinate::parse(extra)?);
        }
        for excluded in &self.excluded_dependencies {
            rule = rule.with_exclusion(ModuleKey::parse(excluded)?);
        }
        for version in &self.skip_versions {
            rule = rule.with_skip_version(Version::parse(version)?);
        }
        Ok(rule)
    }
}

/// One artifact in the catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CatalogEntry {
    /// `group:module`
    pub artifact: String,

    /// Known releases
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub releases: Vec<String>,

    /// Transitive dependencies (`group:module:version`)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    /// Provided symbols
    pub symbols: Vec<CatalogSymbol>,
}

/// A symbol provided by a catalog artifact
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CatalogSymbol {
    /// The symbol
    pub symbol: String,

    /// First version providing it (inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,

    /// First version no longer providing it (exclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
}

impl CatalogEntry {
    /// Parse into an [`Artifact`].
    pub fn to_artifact(&self) -> Result<Artifact> {
        let mut artifact = Artifact::new(ModuleKey::parse(&self.artifact)?);
        for release in &self.releases {
            artifact = artifact.with_release(Version::parse(release)?);
        }
        for dep in &self.dependencies {
            artifact = artifact.with_dependency(Coordinate::parse(dep)?);
        }
        for entry in &self.symbols {
            let mut symbol = SymbolEntry::always(SymbolRef::parse(&entry.symbol)?);
            if let Some(since) = &entry.since {
                symbol = symbol.since(Version::parse(since)?);
            }
            if let Some(until) = &entry.until {
                symbol = symbol.until(Version::parse(until)?);
            }
            artifact = artifact.with_symbol(symbol);
        }
        Ok(artifact)
    }
}

impl MuzzleConfig {
    /// Parse the catalog. Later entries replace earlier ones for the same artifact.
    pub fn catalog(&self) -> Result<Catalog> {
        let mut catalog = Catalog::new();
        for entry in &self.catalog {
            catalog.insert(entry.to_artifact()?);
        }
        Ok(catalog)
    }

    /// Parse the `resolved:` section.
    pub fn dependency_set(&self) -> Result<DependencySet> {
        DependencySet::from_strings(self.resolved.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
name: lambda-events
settings:
  default_output: quiet
  parallel: true
  max_parallel: 2
instrumentation:
  helper_prefixes: [com.fasterxml.jackson.]
  class_loader_matcher: [com.amazonaws.services.lambda.runtime.events.SQSEvent]
  exclusions: [com.fasterxml.jackson.core:jackson-databind]
  references:
    - com.amazonaws.services.lambda.runtime.Context
    - "com.amazonaws.services.lambda.runtime.Context#getAwsRequestId()"
rules:
  - group: com.amazonaws
    module: aws-lambda-java-events
    versions: "[3.3.1,)"
    extra_dependencies: [com.amazonaws:aws-lambda-java-core:1.0.0]
    assert: pass
    skip_versions: [3.4]
catalog:
  - artifact: com.amazonaws:aws-lambda-java-core
    releases: [1.0.0, 1.2]
    symbols:
      - symbol: com.amazonaws.services.lambda.runtime.Context
      - symbol: "com.amazonaws.services.lambda.runtime.Context#getAwsRequestId()"
        since: 1.1
resolved:
  com.amazonaws:aws-lambda-java-events: 3.11.0
"#;

    #[test]
    fn parses_full_config() {
        let config: MuzzleConfig = serde_yaml::from_str(FULL).unwrap();
        assert_eq!(config.name.as_deref(), Some("lambda-events"));
        assert_eq!(config.settings.default_output, OutputMode::Quiet);
        assert!(config.settings.parallel);
        assert_eq!(config.settings.repository_url, DEFAULT_REPOSITORY_URL);
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].skip_versions, vec!["3.4"]);
        assert_eq!(config.catalog[0].releases, vec!["1.0.0", "1.2"]);
        assert_eq!(config.catalog[0].symbols[1].since.as_deref(), Some("1.1"));
    }

    #[test]
    fn unquoted_versions_keep_trailing_zeros() {
        let config: MuzzleConfig = serde_yaml::from_str(
            r#"
rules:
  - group: com.amazonaws
    module: aws-lambda-java-events
    versions: "[2.0,)"
    skip_versions: [2.10, 1.20]
catalog:
  - artifact: com.amazonaws:aws-lambda-java-events
    releases: [2.10, 1.20]
    symbols:
      - symbol: com.amazonaws.services.lambda.runtime.events.SQSEvent
        since: 2.10
        until: 1.20
resolved:
  com.amazonaws:aws-lambda-java-events: 2.10
"#,
        )
        .unwrap();

        assert_eq!(config.rules[0].skip_versions, vec!["2.10", "1.20"]);
        assert_eq!(config.catalog[0].releases, vec!["2.10", "1.20"]);
        assert_eq!(config.catalog[0].symbols[0].since.as_deref(), Some("2.10"));
        assert_eq!(config.catalog[0].symbols[0].until.as_deref(), Some("1.20"));
        assert_eq!(config.resolved["com.amazonaws:aws-lambda-java-events"], "2.10");

        let key = ModuleKey::parse("com.amazonaws:aws-lambda-java-events").unwrap();
        let deps = config.dependency_set().unwrap();
        assert_eq!(deps.get(&key), Some(&Version::parse("2.10").unwrap()));
        assert_ne!(deps.get(&key), Some(&Version::parse("2.1").unwrap()));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: MuzzleConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.rules.is_empty());
        assert_eq!(config.settings.max_parallel, 4);
        assert_eq!(config.settings.cache_ttl_secs, 86_400);
        assert_eq!(config.settings.default_output, OutputMode::Normal);
    }

    #[test]
    fn converts_to_domain_types() {
        let config: MuzzleConfig = serde_yaml::from_str(FULL).unwrap();

        let surface = config.instrumentation.surface().unwrap();
        assert_eq!(surface.references.len(), 2);
        assert_eq!(surface.bootstrap_prefixes, vec!["java.", "javax."]);
        assert_eq!(surface.class_loader_matcher.len(), 1);

        let rule = config.rules[0].to_rule().unwrap();
        assert!(rule.skips(&Version::parse("3.4.0").unwrap()));
        assert_eq!(rule.extra_dependencies().len(), 1);

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 1);

        let deps = config.dependency_set().unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(config.instrumentation.exclusion_keys().unwrap().len(), 1);
    }

    #[test]
    fn rule_defaults_to_pass() {
        let rule: RuleConfig =
            serde_yaml::from_str("group: g\nmodule: m\nversions: \"[1.0,)\"\n").unwrap();
        assert_eq!(rule.assertion, Assertion::Pass);
        assert!(!rule.assert_inverse);
    }

    #[test]
    fn matcher_entries_must_be_classes() {
        let instrumentation = InstrumentationConfig {
            class_loader_matcher: vec!["com.example.Foo#bar()".to_string()],
            ..Default::default()
        };
        assert!(instrumentation.surface().is_err());
    }

    #[test]
    fn custom_bootstrap_prefixes_replace_defaults() {
        let instrumentation = InstrumentationConfig {
            bootstrap_prefixes: Some(vec!["java.".to_string()]),
            ..Default::default()
        };
        let surface = instrumentation.surface().unwrap();
        assert_eq!(surface.bootstrap_prefixes, vec!["java."]);
    }

    #[test]
    fn serializes_without_defaults() {
        let config = MuzzleConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("max_parallel"));
        assert!(!yaml.contains("repository_url"));
    }

    #[test]
    fn schema_lists_top_level_sections() {
        let schema = schemars::schema_for!(MuzzleConfig);
        let json = serde_json::to_value(&schema).unwrap();
        let props = json["properties"].as_object().unwrap();
        assert!(props.contains_key("rules"));
        assert!(props.contains_key("catalog"));
        assert!(props.contains_key("instrumentation"));
    }
}
