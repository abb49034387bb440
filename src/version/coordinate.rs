//! Artifact coordinates.
//!
//! A [`ModuleKey`] names a library (`com.amazonaws:aws-lambda-java-core`);
//! a [`Coordinate`] pins it to a version
//! (`com.amazonaws:aws-lambda-java-events:3.3.1`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{MuzzleError, Result};

use super::release::Version;

/// A `group:module` pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleKey {
    group: String,
    module: String,
}

impl ModuleKey {
    /// Create a key from its parts.
    pub fn new(group: impl Into<String>, module: impl Into<String>) -> Result<Self> {
        let group = group.into();
        let module = module.into();
        let display = format!("{}:{}", group, module);
        check_part(&display, "group", &group)?;
        check_part(&display, "module", &module)?;
        Ok(Self { group, module })
    }

    /// Parse `group:module`.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().split(':').collect::<Vec<_>>().as_slice() {
            [group, module] => Self::new(*group, *module),
            _ => Err(invalid(value, "expected 'group:module'")),
        }
    }

    /// Group identifier.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Module (artifact) identifier.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Path segment used by Maven repositories (`com/amazonaws/aws-lambda-java-core`).
    pub fn repository_path(&self) -> String {
        format!("{}/{}", self.group.replace('.', "/"), self.module)
    }
}

fn check_part(value: &str, what: &str, part: &str) -> Result<()> {
    if part.is_empty() {
        return Err(invalid(value, &format!("{} is empty", what)));
    }
    if part.chars().any(|c| c.is_whitespace() || c == ':') {
        return Err(invalid(value, &format!("{} contains invalid characters", what)));
    }
    Ok(())
}

fn invalid(value: &str, reason: &str) -> MuzzleError {
    MuzzleError::InvalidCoordinate {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.module)
    }
}

impl FromStr for ModuleKey {
    type Err = MuzzleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for ModuleKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ModuleKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A module pinned to a concrete version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    key: ModuleKey,
    version: Version,
}

impl Coordinate {
    /// Create a coordinate from a key and version.
    pub fn new(key: ModuleKey, version: Version) -> Self {
        Self { key, version }
    }

    /// Parse `group:module:version`.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().split(':').collect::<Vec<_>>().as_slice() {
            [group, module, version] => {
                let key = ModuleKey::new(*group, *module)?;
                let version = Version::parse(version).map_err(|e| invalid(value, &e.to_string()))?;
                Ok(Self { key, version })
            }
            _ => Err(invalid(value, "expected 'group:module:version'")),
        }
    }

    /// The module this coordinate pins.
    pub fn key(&self) -> &ModuleKey {
        &self.key
    }

    /// The pinned version.
    pub fn version(&self) -> &Version {
        &self.version
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.version)
    }
}

impl FromStr for Coordinate {
    type Err = MuzzleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
