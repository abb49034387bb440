//! Versions, version ranges, and artifact coordinates.
//!
//! # Example
//!
//! ```
//! use muzzle::version::{Version, VersionRange};
//!
//! let range = VersionRange::parse("[1.0.0,)").unwrap();
//! assert!(range.contains(&Version::parse("1.2.1").unwrap()));
//! assert!(!range.contains(&Version::parse("0.9").unwrap()));
//! ```

pub mod coordinate;
pub mod range;
pub mod release;

pub use coordinate::{Coordinate, ModuleKey};
pub use range::VersionRange;
pub use release::Version;
