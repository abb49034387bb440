//! Compatibility rules and their verification.
//!
//! Rules are declared once and never change. Each call to
//! [`Verifier::verify`] or [`Verifier::verify_across_matrix`] produces fresh
//! [`VerificationResult`]s.
//!
//! # Example
//!
//! ```
//! use muzzle::symbols::{Artifact, Catalog, SymbolEntry, SymbolRef, SymbolSurface};
//! use muzzle::verifier::{DependencySet, Verifier};
//! use muzzle::version::ModuleKey;
//!
//! let context = SymbolRef::parse("com.amazonaws.services.lambda.runtime.Context").unwrap();
//! let key = ModuleKey::parse("com.amazonaws:aws-lambda-java-core").unwrap();
//!
//! let mut catalog = Catalog::new();
//! catalog.insert(Artifact::new(key.clone()).with_symbol(SymbolEntry::always(context.clone())));
//!
//! let mut verifier = Verifier::new(SymbolSurface::new(vec![context]), catalog);
//! verifier
//!     .register_rule("com.amazonaws", "aws-lambda-java-core", "[1.0.0,)", &[])
//!     .unwrap();
//!
//! let deps = DependencySet::from_strings([("com.amazonaws:aws-lambda-java-core", "1.2.1")]).unwrap();
//! assert!(verifier.verify(&deps)[0].is_pass());
//! ```

pub mod dependency_set;
pub mod result;
pub mod rule;
pub mod sampling;
#[allow(clippy::module_inception)]
pub mod verifier;

pub use dependency_set::DependencySet;
pub use result::{MatrixReport, Outcome, SkipReason, VerificationResult, Violation};
pub use rule::{Assertion, CompatibilityRule, RuleId};
pub use sampling::{CandidateVersions, sample_in_range, sample_outside_range};
pub use verifier::Verifier;
