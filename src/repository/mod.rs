//! Candidate versions from a Maven repository.
//!
//! [`MavenRepository`] reads `maven-metadata.xml` for a module and returns
//! its published versions. [`MetadataCache`] keeps those listings on disk
//! for a configurable time so repeated matrix runs stay offline.

pub mod cache;
pub mod maven;

pub use cache::{CachedVersions, MetadataCache};
pub use maven::{parse_metadata, MavenRepository};
