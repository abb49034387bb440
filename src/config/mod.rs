//! Configuration loading, parsing, and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Layering of local overrides in [`merger`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use muzzle::config::{load_merged_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".muzzle");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(
//!     dir.join("config.yml"),
//!     r#"
//! name: lambda-core
//! rules:
//!   - group: com.amazonaws
//!     module: aws-lambda-java-core
//!     versions: "[1.0.0,)"
//! catalog:
//!   - artifact: com.amazonaws:aws-lambda-java-core
//!     releases: ["1.0.0"]
//! "#,
//! )
//! .unwrap();
//!
//! let config = load_merged_config(temp.path()).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.name.as_deref(), Some("lambda-core"));
//! ```
//!
//! # Configuration File Locations
//!
//! Configuration is merged in this order:
//! 1. Project config (`.muzzle/config.yml`)
//! 2. Local overrides (`.muzzle/config.local.yml`)

pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use schema::{
    CatalogEntry, CatalogSymbol, InstrumentationConfig, MuzzleConfig, OutputMode, RuleConfig,
    Settings, DEFAULT_REPOSITORY_URL,
};

pub use loader::{
    find_project_root, load_config, load_config_file, load_config_value, load_merged_config,
    parse_config, ConfigPaths, CONFIG_DIR, CONFIG_FILE, LOCAL_CONFIG_FILE,
};

pub use merger::{deep_merge, merge_configs};

pub use validator::{validate, validate_config, ValidationError};
