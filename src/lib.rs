//! muzzle - compatibility-matrix verification for instrumentation modules.
//!
//! Instrumentation that weaves into third-party libraries (AWS Lambda
//! handlers, event types, serverless containers) only works when every class,
//! method, and field it references exists in the library version loaded at
//! runtime. muzzle declares, per instrumented module, the version range the
//! instrumentation supports and checks that its references link at every
//! sampled version of that range.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, layering, and validation
//! - [`error`] - Error types and result aliases
//! - [`report`] - Diagnostics and human, JSON, and SARIF output
//! - [`repository`] - Maven repository metadata and its cache
//! - [`symbols`] - Symbol references, the artifact catalog, and classpaths
//! - [`templates`] - Embedded starter configurations
//! - [`ui`] - Spinners, progress bars, and terminal output
//! - [`verifier`] - Compatibility rules and their verification
//! - [`version`] - Versions, ranges, and Maven coordinates
//!
//! # Example
//!
//! ```
//! use muzzle::verifier::{CompatibilityRule, DependencySet};
//! use muzzle::version::Version;
//!
//! let rule = CompatibilityRule::parse(
//!     "com.amazonaws",
//!     "aws-lambda-java-events",
//!     "[3.3.1,)",
//!     &["com.amazonaws.serverless:aws-serverless-java-container-core:1.5.2"],
//! )
//! .unwrap();
//! assert!(rule.versions().contains(&Version::parse("3.11.0").unwrap()));
//! assert!(!rule.versions().contains(&Version::parse("3.3.0").unwrap()));
//!
//! let deps = DependencySet::from_strings([("com.amazonaws:aws-lambda-java-events", "3.11.0")]).unwrap();
//! assert_eq!(deps.require(rule.key()).unwrap().to_string(), "3.11.0");
//! ```
//!
//! For file-based config loading, see the integration tests.

pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod repository;
pub mod symbols;
pub mod templates;
pub mod ui;
pub mod verifier;
pub mod version;

pub use error::{MuzzleError, Result};
