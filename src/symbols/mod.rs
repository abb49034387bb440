//! Symbol references, instrumentation surfaces, and the library catalog.
//!
//! A [`SymbolSurface`] lists what instrumentation code needs. A [`Catalog`]
//! records what each library release provides. A [`Classpath`] joins the two
//! for one concrete set of library versions.

pub mod catalog;
pub mod classpath;
pub mod reference;
pub mod surface;

pub use catalog::{Artifact, Catalog, SymbolEntry};
pub use classpath::{Classpath, ClasspathEntry, Lookup, Origin};
pub use reference::SymbolRef;
pub use surface::{SymbolSurface, DEFAULT_BOOTSTRAP_PREFIXES};
