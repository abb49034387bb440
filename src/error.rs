//! Error types for muzzle operations.
//!
//! This module defines [`MuzzleError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Configuration errors (`MalformedRange`, `InvalidCoordinate`, ...) are fatal
//!   at registration time and are never retried
//! - Verification failures are aggregated into `CompatibilityViolation`
//! - Use `anyhow::Error` (via `MuzzleError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

use crate::verifier::MatrixReport;

/// Core error type for muzzle operations.
#[derive(Debug, Error)]
pub enum MuzzleError {
    /// A version range expression could not be parsed or is empty.
    #[error("Malformed version range '{expr}': {reason}")]
    MalformedRange { expr: String, reason: String },

    /// A version string could not be parsed.
    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// A `group:module[:version]` coordinate could not be parsed.
    #[error("Invalid coordinate '{value}': {reason}")]
    InvalidCoordinate { value: String, reason: String },

    /// A symbol reference could not be parsed.
    #[error("Invalid symbol '{value}': {reason}")]
    InvalidSymbol { value: String, reason: String },

    /// A referenced symbol is absent at a sampled version.
    #[error("Missing symbol {symbol} with {module} {version}")]
    MissingSymbol {
        symbol: String,
        module: String,
        version: String,
    },

    /// A rule references a module absent from the dependency set.
    #[error("Module {module} is not present in the dependency set")]
    UnresolvedModule { module: String },

    /// At least one sampled version failed verification.
    #[error("Compatibility violation: {failures} sample(s) failed")]
    CompatibilityViolation {
        failures: usize,
        report: Box<MatrixReport>,
    },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for muzzle operations.
pub type Result<T> = std::result::Result<T, MuzzleError>;
