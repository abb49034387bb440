//! Compatibility rules.
//!
//! A rule claims that instrumentation code links against every version of
//! one module inside a range, with some extra dependencies present and some
//! artifacts deliberately kept off the classpath.

use std::collections::BTreeSet;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::version::{Coordinate, ModuleKey, Version, VersionRange};

/// Position of a rule in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(pub usize);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0 + 1)
    }
}

/// What a rule expects from versions inside its range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Assertion {
    /// Every referenced symbol must resolve.
    #[default]
    Pass,
    /// At least one referenced symbol must be missing.
    Fail,
}

impl Assertion {
    /// The opposite expectation.
    pub fn inverted(self) -> Self {
        match self {
            Self::Pass => Self::Fail,
            Self::Fail => Self::Pass,
        }
    }
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// A declared compatibility claim for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityRule {
    name: Option<String>,
    key: ModuleKey,
    versions: VersionRange,
    extra_dependencies: Vec<Coordinate>,
    excluded_dependencies: BTreeSet<ModuleKey>,
    assertion: Assertion,
    assert_inverse: bool,
    skip_versions: BTreeSet<Version>,
}

impl CompatibilityRule {
    /// Create a `pass` rule for `key` over `versions`.
    pub fn new(key: ModuleKey, versions: VersionRange) -> Self {
        Self {
            name: None,
            key,
            versions,
            extra_dependencies: Vec::new(),
            excluded_dependencies: BTreeSet::new(),
            assertion: Assertion::Pass,
            assert_inverse: false,
            skip_versions: BTreeSet::new(),
        }
    }

    /// Parse a rule from its textual parts.
    ///
    /// Fails with `MalformedRange` for a bad range and `InvalidCoordinate`
    /// for a bad module or extra dependency.
    pub fn parse(group: &str, module: &str, versions: &str, extra_dependencies: &[&str]) -> Result<Self> {
        let key = ModuleKey::new(group, module)?;
        let range = VersionRange::parse(versions)?;
        let mut rule = Self::new(key, range);
        for extra in extra_dependencies {
            rule = rule.with_extra_dependency(Coordinate::parse(extra)?);
        }
        Ok(rule)
    }

    /// Give the rule a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Require an extra dependency on the classpath.
    pub fn with_extra_dependency(mut self, coordinate: Coordinate) -> Self {
        self.extra_dependencies.push(coordinate);
        self
    }

    /// Keep an artifact off the classpath.
    pub fn with_exclusion(mut self, key: ModuleKey) -> Self {
        self.excluded_dependencies.insert(key);
        self
    }

    /// Set the expectation for versions inside the range.
    pub fn with_assertion(mut self, assertion: Assertion) -> Self {
        self.assertion = assertion;
        self
    }

    /// Also check versions outside the range with the opposite expectation.
    pub fn with_assert_inverse(mut self, enabled: bool) -> Self {
        self.assert_inverse = enabled;
        self
    }

    /// Never evaluate `version`.
    pub fn with_skip_version(mut self, version: Version) -> Self {
        self.skip_versions.insert(version);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name if set, otherwise `group:module`.
    pub fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.key.to_string())
    }

    pub fn key(&self) -> &ModuleKey {
        &self.key
    }

    pub fn versions(&self) -> &VersionRange {
        &self.versions
    }

    pub fn extra_dependencies(&self) -> &[Coordinate] {
        &self.extra_dependencies
    }

    pub fn excluded_dependencies(&self) -> &BTreeSet<ModuleKey> {
        &self.excluded_dependencies
    }

    pub fn assertion(&self) -> Assertion {
        self.assertion
    }

    pub fn assert_inverse(&self) -> bool {
        self.assert_inverse
    }

    pub fn skip_versions(&self) -> &BTreeSet<Version> {
        &self.skip_versions
    }

    /// Whether `version` is listed in `skip_versions`.
    pub fn skips(&self, version: &Version) -> bool {
        self.skip_versions.contains(version)
    }
}

impl fmt::Display for CompatibilityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.assertion, self.key, self.versions)
    }
}
