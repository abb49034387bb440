//! Symbol references.
//!
//! Textual forms:
//!
//! - `com.example.Foo` - a class
//! - `com.example.Foo#bar(java.lang.String)` - a method
//! - `com.example.Foo#BAZ` - a field

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{MuzzleError, Result};

/// A class, method, or field referenced by instrumentation code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SymbolRef {
    /// A class by fully-qualified name.
    Class(String),
    /// A method, with its parameter list.
    Method {
        owner: String,
        name: String,
        params: String,
    },
    /// A field.
    Field { owner: String, name: String },
}

impl SymbolRef {
    /// Parse a symbol reference.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(invalid(value, "symbol is empty"));
        }
        if value.chars().any(char::is_whitespace) {
            return Err(invalid(value, "symbol contains whitespace"));
        }

        let Some((owner, member)) = value.split_once('#') else {
            check_class_name(value, value)?;
            return Ok(Self::Class(value.to_string()));
        };

        check_class_name(value, owner)?;
        if member.is_empty() {
            return Err(invalid(value, "member name is empty"));
        }

        match member.split_once('(') {
            Some((name, rest)) => {
                let Some(params) = rest.strip_suffix(')') else {
                    return Err(invalid(value, "method parameters must end with ')'"));
                };
                if name.is_empty() {
                    return Err(invalid(value, "method name is empty"));
                }
                if params.contains(['(', ')']) {
                    return Err(invalid(value, "unbalanced parentheses"));
                }
                Ok(Self::Method {
                    owner: owner.to_string(),
                    name: name.to_string(),
                    params: params.to_string(),
                })
            }
            None => {
                if member.contains(')') || member.contains('#') {
                    return Err(invalid(value, "field name contains invalid characters"));
                }
                Ok(Self::Field {
                    owner: owner.to_string(),
                    name: member.to_string(),
                })
            }
        }
    }

    /// The class that owns this symbol (the class itself for class references).
    pub fn owner(&self) -> &str {
        match self {
            Self::Class(name) => name,
            Self::Method { owner, .. } | Self::Field { owner, .. } => owner,
        }
    }

    /// Whether this symbol is a class.
    pub fn is_class(&self) -> bool {
        matches!(self, Self::Class(_))
    }

    /// The class reference for this symbol's owner.
    pub fn owner_class(&self) -> SymbolRef {
        Self::Class(self.owner().to_string())
    }

    /// Short label for the symbol kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Class(_) => "class",
            Self::Method { .. } => "method",
            Self::Field { .. } => "field",
        }
    }
}

fn check_class_name(value: &str, class: &str) -> Result<()> {
    if class.is_empty() {
        return Err(invalid(value, "class name is empty"));
    }
    if class.starts_with('.') || class.ends_with('.') || class.contains("..") {
        return Err(invalid(value, "class name has an empty package segment"));
    }
    if class.contains(['(', ')']) {
        return Err(invalid(value, "class name contains parentheses"));
    }
    Ok(())
}

fn invalid(value: &str, reason: &str) -> MuzzleError {
    MuzzleError::InvalidSymbol {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl fmt::Display for SymbolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(name) => write!(f, "{}", name),
            Self::Method {
                owner,
                name,
                params,
            } => write!(f, "{}#{}({})", owner, name, params),
            Self::Field { owner, name } => write!(f, "{}#{}", owner, name),
        }
    }
}

impl FromStr for SymbolRef {
    type Err = MuzzleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for SymbolRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SymbolRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
