//! Declared API surfaces of library releases.
//!
//! The catalog records, for each artifact, which releases are known, which
//! artifacts it pulls in transitively, and which symbols it provides at
//! which versions.

use std::collections::BTreeMap;

use crate::version::{Coordinate, ModuleKey, Version};

use super::reference::SymbolRef;

/// A symbol provided by an artifact over a span of versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    /// The provided symbol.
    pub symbol: SymbolRef,
    /// First version providing the symbol (inclusive).
    pub since: Option<Version>,
    /// First version no longer providing the symbol (exclusive).
    pub until: Option<Version>,
}

impl SymbolEntry {
    /// A symbol available in every release.
    pub fn always(symbol: SymbolRef) -> Self {
        Self {
            symbol,
            since: None,
            until: None,
        }
    }

    /// Set the first version providing the symbol.
    pub fn since(mut self, version: Version) -> Self {
        self.since = Some(version);
        self
    }

    /// Set the first version no longer providing the symbol.
    pub fn until(mut self, version: Version) -> Self {
        self.until = Some(version);
        self
    }

    /// Whether the symbol is present in `version`.
    pub fn available_at(&self, version: &Version) -> bool {
        self.since.as_ref().is_none_or(|since| version >= since)
            && self.until.as_ref().is_none_or(|until| version < until)
    }
}

/// One library in the catalog.
#[derive(Debug, Clone)]
pub struct Artifact {
    key: ModuleKey,
    releases: Vec<Version>,
    dependencies: Vec<Coordinate>,
    symbols: Vec<SymbolEntry>,
}

impl Artifact {
    /// Create an artifact with no releases, dependencies, or symbols.
    pub fn new(key: ModuleKey) -> Self {
        Self {
            key,
            releases: Vec::new(),
            dependencies: Vec::new(),
            symbols: Vec::new(),
        }
    }

    /// Add a known release. Releases stay sorted and unique.
    pub fn with_release(mut self, version: Version) -> Self {
        if let Err(pos) = self.releases.binary_search(&version) {
            self.releases.insert(pos, version);
        }
        self
    }

    /// Add a transitive dependency.
    pub fn with_dependency(mut self, coordinate: Coordinate) -> Self {
        self.dependencies.push(coordinate);
        self
    }

    /// Add a provided symbol.
    pub fn with_symbol(mut self, entry: SymbolEntry) -> Self {
        self.symbols.push(entry);
        self
    }

    /// The artifact's module key.
    pub fn key(&self) -> &ModuleKey {
        &self.key
    }

    /// Known releases in ascending order.
    pub fn releases(&self) -> &[Version] {
        &self.releases
    }

    /// Transitive dependencies pulled in by this artifact.
    pub fn dependencies(&self) -> &[Coordinate] {
        &self.dependencies
    }

    /// All symbol entries.
    pub fn symbols(&self) -> &[SymbolEntry] {
        &self.symbols
    }

    /// Whether `version` of this artifact provides `symbol`.
    pub fn provides(&self, symbol: &SymbolRef, version: &Version) -> bool {
        self.symbols
            .iter()
            .any(|entry| entry.symbol == *symbol && entry.available_at(version))
    }
}

/// All artifacts whose API surface is known.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    artifacts: BTreeMap<ModuleKey, Artifact>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an artifact, returning any previous entry for the same key.
    pub fn insert(&mut self, artifact: Artifact) -> Option<Artifact> {
        self.artifacts.insert(artifact.key.clone(), artifact)
    }

    /// Look up an artifact.
    pub fn get(&self, key: &ModuleKey) -> Option<&Artifact> {
        self.artifacts.get(key)
    }

    /// Whether the catalog knows `key`.
    pub fn contains(&self, key: &ModuleKey) -> bool {
        self.artifacts.contains_key(key)
    }

    /// Known releases of `key` (empty when unknown).
    pub fn releases(&self, key: &ModuleKey) -> &[Version] {
        self.artifacts
            .get(key)
            .map(|a| a.releases())
            .unwrap_or_default()
    }

    /// Iterate over artifacts in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.values()
    }

    /// Number of artifacts.
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}
