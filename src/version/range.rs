//! Version range parsing in Maven interval notation.
//!
//! Supported forms:
//!
//! - `[1.0.0,)` - at least 1.0.0
//! - `(,2.0)` - below 2.0
//! - `[1.0,2.0)` - half-open interval
//! - `[1.5]` or `1.5` - exactly 1.5
//!
//! Unions such as `[1.0,2.0),[3.0,)` are rejected.

use std::fmt;
use std::str::FromStr;

use crate::error::{MuzzleError, Result};

use super::release::Version;

/// An interval over [`Version`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    lower: Option<Version>,
    lower_inclusive: bool,
    upper: Option<Version>,
    upper_inclusive: bool,
}

impl VersionRange {
    /// Parse a range expression.
    ///
    /// Fails with [`MuzzleError::MalformedRange`] when the expression cannot be
    /// parsed, its bounds are inverted, or it denotes an empty interval.
    pub fn parse(expr: &str) -> Result<Self> {
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Err(malformed(expr, "range is empty"));
        }

        let open = trimmed.chars().next();
        let close = trimmed.chars().last();

        let (lower_inclusive, upper_inclusive) = match (open, close) {
            (Some('['), Some(']')) => (true, true),
            (Some('['), Some(')')) => (true, false),
            (Some('('), Some(']')) => (false, true),
            (Some('('), Some(')')) => (false, false),
            (Some('[' | '('), _) => return Err(malformed(expr, "missing closing bracket")),
            (_, Some(']' | ')')) => return Err(malformed(expr, "missing opening bracket")),
            _ => {
                let version = parse_bound(expr, trimmed)?;
                return Ok(Self::exact(version));
            }
        };

        let inner = &trimmed[1..trimmed.len() - 1];
        if inner.contains(['[', ']', '(', ')']) {
            return Err(malformed(expr, "unions of ranges are not supported"));
        }

        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        let range = match parts.as_slice() {
            [single] => {
                if !(lower_inclusive && upper_inclusive) {
                    return Err(malformed(expr, "an exact version must use '[' and ']'"));
                }
                Self::exact(parse_bound(expr, single)?)
            }
            [lower, upper] => {
                let lower = if lower.is_empty() {
                    if lower_inclusive {
                        return Err(malformed(expr, "an unbounded lower end must use '('"));
                    }
                    None
                } else {
                    Some(parse_bound(expr, lower)?)
                };
                let upper = if upper.is_empty() {
                    if upper_inclusive {
                        return Err(malformed(expr, "an unbounded upper end must use ')'"));
                    }
                    None
                } else {
                    Some(parse_bound(expr, upper)?)
                };
                Self {
                    lower,
                    lower_inclusive,
                    upper,
                    upper_inclusive,
                }
            }
            _ => return Err(malformed(expr, "expected at most one ','")),
        };

        range.check_bounds(expr)?;
        Ok(range)
    }

    /// A range containing exactly one version.
    pub fn exact(version: Version) -> Self {
        Self {
            lower: Some(version.clone()),
            lower_inclusive: true,
            upper: Some(version),
            upper_inclusive: true,
        }
    }

    /// A range containing every version at or above `version`.
    pub fn at_least(version: Version) -> Self {
        Self {
            lower: Some(version),
            lower_inclusive: true,
            upper: None,
            upper_inclusive: false,
        }
    }

    fn check_bounds(&self, expr: &str) -> Result<()> {
        if let (Some(lower), Some(upper)) = (&self.lower, &self.upper) {
            if lower > upper {
                return Err(malformed(expr, "bounds are inverted"));
            }
            if lower == upper && !(self.lower_inclusive && self.upper_inclusive) {
                return Err(malformed(expr, "interval contains no versions"));
            }
        }
        if self.lower.is_none() && self.upper.is_none() {
            return Err(malformed(expr, "at least one bound is required"));
        }
        Ok(())
    }

    /// Lower bound, if bounded below.
    pub fn lower(&self) -> Option<&Version> {
        self.lower.as_ref()
    }

    /// Whether the lower bound is part of the range.
    pub fn lower_inclusive(&self) -> bool {
        self.lower_inclusive
    }

    /// Upper bound, if bounded above.
    pub fn upper(&self) -> Option<&Version> {
        self.upper.as_ref()
    }

    /// Whether the upper bound is part of the range.
    pub fn upper_inclusive(&self) -> bool {
        self.upper_inclusive
    }

    /// Whether the range has no upper end.
    pub fn is_upper_unbounded(&self) -> bool {
        self.upper.is_none()
    }

    /// Check whether `version` lies inside the range.
    pub fn contains(&self, version: &Version) -> bool {
        let above_lower = match &self.lower {
            None => true,
            Some(lower) if self.lower_inclusive => version >= lower,
            Some(lower) => version > lower,
        };
        let below_upper = match &self.upper {
            None => true,
            Some(upper) if self.upper_inclusive => version <= upper,
            Some(upper) => version < upper,
        };
        above_lower && below_upper
    }

    /// Bounds that belong to the range, in ascending order.
    pub fn inclusive_endpoints(&self) -> Vec<Version> {
        let mut endpoints = Vec::new();
        if let Some(lower) = self.lower.as_ref().filter(|_| self.lower_inclusive) {
            endpoints.push(lower.clone());
        }
        if let Some(upper) = self.upper.as_ref().filter(|_| self.upper_inclusive) {
            if endpoints.last() != Some(upper) {
                endpoints.push(upper.clone());
            }
        }
        endpoints
    }
}

fn parse_bound(expr: &str, bound: &str) -> Result<Version> {
    Version::parse(bound).map_err(|e| match e {
        MuzzleError::InvalidVersion { version, reason } => {
            malformed(expr, &format!("bad bound '{}': {}", version, reason))
        }
        other => other,
    })
}

fn malformed(expr: &str, reason: &str) -> MuzzleError {
    MuzzleError::MalformedRange {
        expr: expr.to_string(),
        reason: reason.to_string(),
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(lower), Some(upper)) = (&self.lower, &self.upper) {
            if lower == upper {
                return write!(f, "[{}]", lower);
            }
        }
        write!(
            f,
            "{}{},{}{}",
            if self.lower_inclusive { '[' } else { '(' },
            self.lower.as_ref().map(|v| v.to_string()).unwrap_or_default(),
            self.upper.as_ref().map(|v| v.to_string()).unwrap_or_default(),
            if self.upper_inclusive { ']' } else { ')' },
        )
    }
}

impl FromStr for VersionRange {
    type Err = MuzzleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
