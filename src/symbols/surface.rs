//! The symbol surface an instrumentation module references.

use serde::{Deserialize, Serialize};

use super::reference::SymbolRef;

/// Prefixes of classes that are always present on the boot classpath.
pub const DEFAULT_BOOTSTRAP_PREFIXES: &[&str] = &["java.", "javax."];

/// What the instrumentation code needs from the libraries it targets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolSurface {
    /// Symbols referenced by instrumentation code.
    pub references: Vec<SymbolRef>,
    /// Package prefixes of helper classes injected by the agent itself.
    pub helper_prefixes: Vec<String>,
    /// Package prefixes that are always resolvable.
    pub bootstrap_prefixes: Vec<String>,
    /// Marker classes that must be present for the module to apply.
    pub class_loader_matcher: Vec<String>,
}

impl SymbolSurface {
    /// Create a surface from references, with default bootstrap prefixes.
    pub fn new(references: Vec<SymbolRef>) -> Self {
        Self {
            references,
            helper_prefixes: Vec::new(),
            bootstrap_prefixes: DEFAULT_BOOTSTRAP_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            class_loader_matcher: Vec::new(),
        }
    }

    /// Add a helper-class prefix.
    pub fn with_helper_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.helper_prefixes.push(prefix.into());
        self
    }

    /// Add a class-loader matcher class.
    pub fn with_matcher_class(mut self, class: impl Into<String>) -> Self {
        self.class_loader_matcher.push(class.into());
        self
    }

    /// Whether a symbol must be found on the library classpath.
    ///
    /// Helper classes are injected by the agent and bootstrap classes
    /// come with the runtime, so neither is looked up.
    pub fn requires_lookup(&self, symbol: &SymbolRef) -> bool {
        let owner = symbol.owner();
        !self
            .helper_prefixes
            .iter()
            .chain(self.bootstrap_prefixes.iter())
            .any(|prefix| owner.starts_with(prefix.as_str()))
    }

    /// References that need a classpath lookup, deduplicated, in declaration order.
    pub fn checked_references(&self) -> Vec<&SymbolRef> {
        let mut seen = std::collections::HashSet::new();
        self.references
            .iter()
            .filter(|s| self.requires_lookup(s))
            .filter(|s| seen.insert(*s))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> SymbolRef {
        SymbolRef::parse(s).unwrap()
    }

    #[test]
    fn bootstrap_classes_are_not_looked_up() {
        let surface = SymbolSurface::new(vec![sym("java.util.Map"), sym("com.example.Foo")]);
        assert!(!surface.requires_lookup(&sym("java.util.Map")));
        assert!(!surface.requires_lookup(&sym("javax.net.ssl.SSLContext#getDefault()")));
        assert!(surface.requires_lookup(&sym("com.example.Foo")));
    }

    #[test]
    fn helper_classes_are_not_looked_up() {
        let surface = SymbolSurface::new(vec![]).with_helper_prefix("com.fasterxml.jackson.");
        assert!(!surface.requires_lookup(&sym("com.fasterxml.jackson.databind.ObjectMapper")));
        assert!(surface.requires_lookup(&sym("com.amazonaws.services.lambda.runtime.Context")));
    }

    #[test]
    fn checked_references_filter_and_dedupe() {
        let surface = SymbolSurface::new(vec![
            sym("com.example.A"),
            sym("java.lang.String"),
            sym("com.example.A"),
            sym("com.example.A#b()"),
        ]);
        let checked: Vec<String> = surface
            .checked_references()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(checked, vec!["com.example.A", "com.example.A#b()"]);
    }

    #[test]
    fn builder_adds_matcher_classes() {
        let surface = SymbolSurface::new(vec![])
            .with_matcher_class("com.amazonaws.services.lambda.runtime.events.SQSEvent");
        assert_eq!(surface.class_loader_matcher.len(), 1);
    }
}
