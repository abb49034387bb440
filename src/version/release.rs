//! Release version parsing and ordering.
//!
//! Versions are dotted numeric components with an optional qualifier,
//! the way Maven artifacts are published (`1.2.1`, `1.0.0-RC1`,
//! `2.13.4.Final`).

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{MuzzleError, Result};

/// Qualifiers that mean "this is the release itself".
const RELEASE_QUALIFIERS: &[&str] = &["final", "ga", "release"];

/// A parsed library version with a total order.
///
/// Missing numeric components compare as zero, so `1.0` and `1.0.0` are
/// equal. A qualified version sorts before the bare release.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    numbers: Vec<u64>,
    qualifier: Option<String>,
}

impl Version {
    /// Parse a version string.
    pub fn parse(input: &str) -> Result<Self> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(invalid(input, "version is empty"));
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(invalid(input, "version contains whitespace"));
        }

        let (numeric, mut qualifier) = match raw.split_once('-') {
            Some((n, q)) => (n, Some(q.to_string())),
            None => (raw, None),
        };

        let mut numbers = Vec::new();
        let mut parts = numeric.split('.');
        while let Some(part) = parts.next() {
            match part.parse::<u64>() {
                Ok(n) => numbers.push(n),
                Err(_) if !numbers.is_empty() && qualifier.is_none() => {
                    // `2.13.4.Final`: the rest is a dot-separated qualifier
                    let rest: Vec<&str> = std::iter::once(part).chain(parts.by_ref()).collect();
                    qualifier = Some(rest.join("."));
                    break;
                }
                Err(_) => {
                    return Err(invalid(
                        input,
                        &format!("'{}' is not a numeric component", part),
                    ))
                }
            }
        }

        if numbers.is_empty() {
            return Err(invalid(input, "version has no numeric components"));
        }
        if qualifier.as_deref() == Some("") {
            return Err(invalid(input, "qualifier is empty"));
        }

        Ok(Self {
            raw: raw.to_string(),
            numbers,
            qualifier,
        })
    }

    /// The version as originally written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Numeric components in order.
    pub fn numbers(&self) -> &[u64] {
        &self.numbers
    }

    /// The qualifier, if any (`RC1` in `1.0.0-RC1`).
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// Whether this version carries a pre-release qualifier.
    pub fn is_prerelease(&self) -> bool {
        self.normalized_qualifier().is_some()
    }

    fn significant_numbers(&self) -> &[u64] {
        let end = self
            .numbers
            .iter()
            .rposition(|n| *n != 0)
            .map_or(0, |i| i + 1);
        &self.numbers[..end]
    }

    fn normalized_qualifier(&self) -> Option<String> {
        let q = self.qualifier.as_ref()?.to_lowercase();
        if RELEASE_QUALIFIERS.contains(&q.as_str()) {
            None
        } else {
            Some(q)
        }
    }
}

fn invalid(input: &str, reason: &str) -> MuzzleError {
    MuzzleError::InvalidVersion {
        version: input.to_string(),
        reason: reason.to_string(),
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.numbers.len().max(other.numbers.len());
        for i in 0..len {
            let a = self.numbers.get(i).copied().unwrap_or(0);
            let b = other.numbers.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }

        match (self.normalized_qualifier(), other.normalized_qualifier()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(&b),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant_numbers().hash(state);
        self.normalized_qualifier().hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl FromStr for Version {
    type Err = MuzzleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
