//! Effective classpath for one verification.
//!
//! The classpath starts from a resolved dependency set, adds a rule's extra
//! dependencies, then follows catalog dependencies transitively. Excluded
//! artifacts never enter it, whatever pulled them in.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tracing::debug;

use crate::version::{Coordinate, ModuleKey, Version};

use super::catalog::Catalog;
use super::reference::SymbolRef;

/// How an artifact ended up on the classpath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Present in the resolved dependency set.
    Resolved,
    /// Declared as a rule's extra dependency.
    Extra,
    /// Pulled in by another artifact.
    Transitive { via: ModuleKey },
}

/// An artifact on the classpath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClasspathEntry {
    /// Version on the classpath.
    pub version: Version,
    /// How it got there.
    pub origin: Origin,
}

/// Result of looking up a symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Provided by an artifact on the classpath.
    Found { provider: ModuleKey },
    /// Only an excluded artifact would have provided it.
    Excluded { by: ModuleKey },
    /// Nothing provides it.
    Missing,
}

/// The set of artifacts visible to instrumentation code.
#[derive(Debug, Clone, Default)]
pub struct Classpath {
    entries: BTreeMap<ModuleKey, ClasspathEntry>,
    excluded: BTreeMap<ModuleKey, Version>,
}

impl Classpath {
    /// Build the effective classpath.
    ///
    /// Resolved versions win over extra dependencies for the same module.
    /// Among transitive candidates, the first one reached wins.
    pub fn build<'a>(
        catalog: &Catalog,
        resolved: impl IntoIterator<Item = (&'a ModuleKey, &'a Version)>,
        extras: &[Coordinate],
        exclusions: &BTreeSet<ModuleKey>,
    ) -> Self {
        let mut classpath = Self::default();
        let mut queue = VecDeque::new();

        let direct = resolved
            .into_iter()
            .map(|(k, v)| (k.clone(), v.clone(), Origin::Resolved))
            .chain(
                extras
                    .iter()
                    .map(|c| (c.key().clone(), c.version().clone(), Origin::Extra)),
            );

        for (key, version, origin) in direct {
            if classpath.admit(key.clone(), version, origin, exclusions) {
                queue.push_back(key);
            }
        }

        while let Some(key) = queue.pop_front() {
            let Some(artifact) = catalog.get(&key) else {
                debug!("{} is not in the catalog; no transitive dependencies", key);
                continue;
            };
            for dep in artifact.dependencies() {
                let origin = Origin::Transitive { via: key.clone() };
                if classpath.admit(dep.key().clone(), dep.version().clone(), origin, exclusions) {
                    queue.push_back(dep.key().clone());
                }
            }
        }

        classpath
    }

    fn admit(
        &mut self,
        key: ModuleKey,
        version: Version,
        origin: Origin,
        exclusions: &BTreeSet<ModuleKey>,
    ) -> bool {
        if exclusions.contains(&key) {
            debug!("Excluding {}:{} ({:?})", key, version, origin);
            self.excluded.entry(key).or_insert(version);
            return false;
        }
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, ClasspathEntry { version, origin });
        true
    }

    /// Version of `key` on the classpath.
    pub fn version_of(&self, key: &ModuleKey) -> Option<&Version> {
        self.entries.get(key).map(|e| &e.version)
    }

    /// Entry for `key`.
    pub fn entry(&self, key: &ModuleKey) -> Option<&ClasspathEntry> {
        self.entries.get(key)
    }

    /// Whether `key` was kept off the classpath by an exclusion.
    pub fn is_excluded(&self, key: &ModuleKey) -> bool {
        self.excluded.contains_key(key)
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&ModuleKey, &ClasspathEntry)> {
        self.entries.iter()
    }

    /// Number of artifacts on the classpath.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the classpath is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find what provides `symbol`.
    pub fn lookup(&self, catalog: &Catalog, symbol: &SymbolRef) -> Lookup {
        let present = self.entries.iter().map(|(k, e)| (k, &e.version));
        if let Some(provider) = find_provider(catalog, present, symbol) {
            return Lookup::Found { provider };
        }
        match find_provider(catalog, self.excluded.iter(), symbol) {
            Some(by) => Lookup::Excluded { by },
            None => Lookup::Missing,
        }
    }

    /// Whether a method or field's owner and the member itself both resolve.
    pub fn resolves(&self, catalog: &Catalog, symbol: &SymbolRef) -> Lookup {
        if !symbol.is_class() {
            match self.lookup(catalog, &symbol.owner_class()) {
                Lookup::Found { .. } => {}
                other => return other,
            }
        }
        self.lookup(catalog, symbol)
    }
}

fn find_provider<'a>(
    catalog: &Catalog,
    mut candidates: impl Iterator<Item = (&'a ModuleKey, &'a Version)>,
    symbol: &SymbolRef,
) -> Option<ModuleKey> {
    candidates.find_map(|(key, version)| {
        catalog
            .get(key)
            .filter(|artifact| artifact.provides(symbol, version))
            .map(|_| key.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::catalog::{Artifact, SymbolEntry};

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn key(s: &str) -> ModuleKey {
        ModuleKey::parse(s).unwrap()
    }

    fn sym(s: &str) -> SymbolRef {
        SymbolRef::parse(s).unwrap()
    }

    fn coord(s: &str) -> Coordinate {
        Coordinate::parse(s).unwrap()
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert(
            Artifact::new(key("com.example:events"))
                .with_dependency(coord("com.example:json:2.0"))
                .with_symbol(SymbolEntry::always(sym("com.example.events.Event"))),
        );
        catalog.insert(
            Artifact::new(key("com.example:json"))
                .with_dependency(coord("com.example:annotations:1.0"))
                .with_symbol(SymbolEntry::always(sym("com.example.json.Mapper")))
                .with_symbol(SymbolEntry::always(sym("com.example.json.Mapper#read()")))
                .with_symbol(SymbolEntry::always(sym("com.example.json.Mapper#write()")).since(v("2.5"))),
        );
        catalog.insert(
            Artifact::new(key("com.example:annotations"))
                .with_symbol(SymbolEntry::always(sym("com.example.annotations.Json"))),
        );
        catalog
    }

    #[test]
    fn follows_transitive_dependencies() {
        let catalog = catalog();
        let resolved = BTreeMap::from([(key("com.example:events"), v("1.0"))]);
        let cp = Classpath::build(&catalog, &resolved, &[], &BTreeSet::new());

        assert_eq!(cp.len(), 3);
        assert_eq!(cp.version_of(&key("com.example:json")), Some(&v("2.0")));
        assert_eq!(
            cp.entry(&key("com.example:annotations")).unwrap().origin,
            Origin::Transitive {
                via: key("com.example:json")
            }
        );
    }

    #[test]
    fn resolved_versions_win_over_extras_and_transitives() {
        let catalog = catalog();
        let resolved = BTreeMap::from([
            (key("com.example:events"), v("1.0")),
            (key("com.example:json"), v("2.6")),
        ]);
        let extras = vec![coord("com.example:json:1.0")];
        let cp = Classpath::build(&catalog, &resolved, &extras, &BTreeSet::new());

        let entry = cp.entry(&key("com.example:json")).unwrap();
        assert_eq!(entry.version, v("2.6"));
        assert_eq!(entry.origin, Origin::Resolved);
    }

    #[test]
    fn extras_join_the_classpath() {
        let catalog = catalog();
        let resolved: BTreeMap<ModuleKey, Version> = BTreeMap::new();
        let extras = vec![coord("com.example:json:2.0")];
        let cp = Classpath::build(&catalog, &resolved, &extras, &BTreeSet::new());

        assert_eq!(cp.entry(&key("com.example:json")).unwrap().origin, Origin::Extra);
        assert!(cp.version_of(&key("com.example:annotations")).is_some());
    }

    #[test]
    fn exclusions_block_transitive_artifacts() {
        let catalog = catalog();
        let resolved = BTreeMap::from([(key("com.example:events"), v("1.0"))]);
        let exclusions = BTreeSet::from([key("com.example:json")]);
        let cp = Classpath::build(&catalog, &resolved, &[], &exclusions);

        assert!(cp.version_of(&key("com.example:json")).is_none());
        assert!(cp.is_excluded(&key("com.example:json")));
        // Nothing else pulls annotations in once json is gone.
        assert!(cp.version_of(&key("com.example:annotations")).is_none());
    }

    #[test]
    fn lookup_reports_excluded_provider() {
        let catalog = catalog();
        let resolved = BTreeMap::from([(key("com.example:events"), v("1.0"))]);
        let exclusions = BTreeSet::from([key("com.example:json")]);
        let cp = Classpath::build(&catalog, &resolved, &[], &exclusions);

        assert_eq!(
            cp.lookup(&catalog, &sym("com.example.events.Event")),
            Lookup::Found {
                provider: key("com.example:events")
            }
        );
        assert_eq!(
            cp.lookup(&catalog, &sym("com.example.json.Mapper")),
            Lookup::Excluded {
                by: key("com.example:json")
            }
        );
        assert_eq!(
            cp.lookup(&catalog, &sym("com.example.Nowhere")),
            Lookup::Missing
        );
    }

    #[test]
    fn members_need_their_owner_and_version() {
        let catalog = catalog();
        let resolved = BTreeMap::from([(key("com.example:json"), v("2.0"))]);
        let cp = Classpath::build(&catalog, &resolved, &[], &BTreeSet::new());

        assert!(matches!(
            cp.resolves(&catalog, &sym("com.example.json.Mapper#read()")),
            Lookup::Found { .. }
        ));
        assert_eq!(
            cp.resolves(&catalog, &sym("com.example.json.Mapper#write()")),
            Lookup::Missing
        );
        assert_eq!(
            cp.resolves(&catalog, &sym("com.example.Other#read()")),
            Lookup::Missing
        );
    }
}
