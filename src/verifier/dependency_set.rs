//! Resolved dependency sets.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{MuzzleError, Result};
use crate::version::{ModuleKey, Version};

/// Concrete versions resolved for one build.
///
/// A set never changes once built; [`DependencySet::with`] returns a copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    versions: BTreeMap<ModuleKey, Version>,
}

impl DependencySet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding a single module.
    pub fn single(key: ModuleKey, version: Version) -> Self {
        Self {
            versions: BTreeMap::from([(key, version)]),
        }
    }

    /// A copy of this set with `key` pinned to `version`.
    pub fn with(&self, key: ModuleKey, version: Version) -> Self {
        let mut versions = self.versions.clone();
        versions.insert(key, version);
        Self { versions }
    }

    /// Parse `group:module` keys and version strings.
    pub fn from_strings<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let mut versions = BTreeMap::new();
        for (key, version) in entries {
            versions.insert(ModuleKey::parse(key)?, Version::parse(version)?);
        }
        Ok(Self { versions })
    }

    /// Load a YAML mapping of `group:module` to version.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let raw: BTreeMap<String, String> =
            serde_yaml::from_str(&content).map_err(|e| MuzzleError::ConfigParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Self::from_strings(raw.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Parse `group:module=version` or `group:module:version`.
    pub fn parse_assignment(value: &str) -> Result<(ModuleKey, Version)> {
        let (key, version) = match value.split_once('=') {
            Some((key, version)) => (key.trim(), version.trim()),
            None => match value.rsplit_once(':') {
                Some((key, version)) if key.contains(':') => (key, version),
                _ => {
                    return Err(MuzzleError::InvalidCoordinate {
                        value: value.to_string(),
                        reason: "expected group:module=version".to_string(),
                    })
                }
            },
        };
        Ok((ModuleKey::parse(key)?, Version::parse(version)?))
    }

    /// Version resolved for `key`.
    pub fn get(&self, key: &ModuleKey) -> Option<&Version> {
        self.versions.get(key)
    }

    /// Version resolved for `key`, or `UnresolvedModule`.
    pub fn require(&self, key: &ModuleKey) -> Result<&Version> {
        self.versions
            .get(key)
            .ok_or_else(|| MuzzleError::UnresolvedModule {
                module: key.to_string(),
            })
    }

    pub fn contains(&self, key: &ModuleKey) -> bool {
        self.versions.contains_key(key)
    }

    /// Iterate over modules in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&ModuleKey, &Version)> {
        self.versions.iter()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

impl FromIterator<(ModuleKey, Version)> for DependencySet {
    fn from_iter<I: IntoIterator<Item = (ModuleKey, Version)>>(iter: I) -> Self {
        Self {
            versions: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DependencySet {
    type Item = (&'a ModuleKey, &'a Version);
    type IntoIter = std::collections::btree_map::Iter<'a, ModuleKey, Version>;

    fn into_iter(self) -> Self::IntoIter {
        self.versions.iter()
    }
}
