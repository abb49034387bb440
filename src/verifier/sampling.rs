//! Choosing which versions of a module to verify.
//!
//! A rule's range is sampled at its inclusive endpoints plus every known
//! release that lies inside it. Known releases come from the catalog and
//! from caller-supplied candidates (for example a Maven repository listing).

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{MuzzleError, Result};
use crate::version::{ModuleKey, Version};

use super::rule::CompatibilityRule;

/// Candidate versions per module, supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateVersions {
    versions: BTreeMap<ModuleKey, BTreeSet<Version>>,
}

impl CandidateVersions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one candidate.
    pub fn add(&mut self, key: ModuleKey, version: Version) {
        self.versions.entry(key).or_default().insert(version);
    }

    /// Add several candidates for one module.
    pub fn extend(&mut self, key: ModuleKey, versions: impl IntoIterator<Item = Version>) {
        self.versions.entry(key).or_default().extend(versions);
    }

    /// Parse `group:module=v1,v2,...` and add the result.
    pub fn add_spec(&mut self, spec: &str) -> Result<()> {
        let Some((key, list)) = spec.split_once('=') else {
            return Err(MuzzleError::InvalidCoordinate {
                value: spec.to_string(),
                reason: "expected group:module=version[,version...]".to_string(),
            });
        };
        let key = ModuleKey::parse(key.trim())?;
        let versions = list
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(Version::parse)
            .collect::<Result<Vec<_>>>()?;
        self.extend(key, versions);
        Ok(())
    }

    /// Candidates for `key` in ascending order.
    pub fn get(&self, key: &ModuleKey) -> impl Iterator<Item = &Version> {
        self.versions.get(key).into_iter().flatten()
    }

    /// Modules with at least one candidate.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleKey> {
        self.versions.keys()
    }

    /// Total number of candidates.
    pub fn len(&self) -> usize {
        self.versions.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Versions to evaluate inside the rule's range, ascending and deduplicated.
///
/// Versions listed in `skip_versions` are kept so they surface as skipped
/// results rather than vanishing from the report.
pub fn sample_in_range<'a>(
    rule: &CompatibilityRule,
    known: impl IntoIterator<Item = &'a Version>,
) -> Vec<Version> {
    let range = rule.versions();
    let mut sample: BTreeSet<Version> = range.inclusive_endpoints().into_iter().collect();
    sample.extend(known.into_iter().filter(|v| range.contains(v)).cloned());
    sample.into_iter().collect()
}

/// Known versions outside the rule's range, for inverse assertions.
pub fn sample_outside_range<'a>(
    rule: &CompatibilityRule,
    known: impl IntoIterator<Item = &'a Version>,
) -> Vec<Version> {
    let range = rule.versions();
    known
        .into_iter()
        .filter(|v| !range.contains(v) && !rule.skips(v))
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn rule(range: &str) -> CompatibilityRule {
        CompatibilityRule::parse("com.amazonaws", "aws-lambda-java-events", range, &[]).unwrap()
    }

    fn strings(versions: &[Version]) -> Vec<String> {
        versions.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn samples_endpoints_and_known_releases() {
        let known = [v("2.2.0"), v("3.3.1"), v("3.4.0"), v("3.11.0"), v("4.0.0")];
        let sample = sample_in_range(&rule("[3.3.1,4.0.0)"), &known);
        assert_eq!(strings(&sample), vec!["3.3.1", "3.4.0", "3.11.0"]);
    }

    #[test]
    fn unbounded_range_keeps_lower_endpoint() {
        let sample = sample_in_range(&rule("[1.0.0,)"), &[]);
        assert_eq!(strings(&sample), vec!["1.0.0"]);
    }

    #[test]
    fn equal_versions_are_sampled_once() {
        let known = [v("1.0"), v("1.0.0")];
        let sample = sample_in_range(&rule("[1.0.0,)"), &known);
        assert_eq!(sample.len(), 1);
    }

    #[test]
    fn outside_sample_excludes_range_and_skips() {
        let r = rule("[3.0,)").with_skip_version(v("2.1"));
        let known = [v("1.0"), v("2.1"), v("2.2"), v("3.0"), v("3.1")];
        assert_eq!(strings(&sample_outside_range(&r, &known)), vec!["1.0", "2.2"]);
    }

    #[test]
    fn candidates_parse_specs() {
        let mut candidates = CandidateVersions::new();
        candidates
            .add_spec("com.amazonaws:aws-lambda-java-core=1.2.1, 1.0.0,1.2.1")
            .unwrap();
        let key = ModuleKey::parse("com.amazonaws:aws-lambda-java-core").unwrap();
        let listed: Vec<String> = candidates.get(&key).map(|v| v.to_string()).collect();
        assert_eq!(listed, vec!["1.0.0", "1.2.1"]);
        assert_eq!(candidates.len(), 2);
        assert!(candidates.add_spec("no-equals-sign").is_err());
        assert!(candidates.add_spec("g:m=not..a..version").is_err());
    }

    #[test]
    fn missing_module_has_no_candidates() {
        let candidates = CandidateVersions::new();
        let key = ModuleKey::parse("g:m").unwrap();
        assert_eq!(candidates.get(&key).count(), 0);
        assert!(candidates.is_empty());
    }
}
