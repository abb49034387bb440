//! Configuration file discovery and loading.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::{DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::config::merger::merge_configs;
use crate::config::schema::MuzzleConfig;
use crate::error::{MuzzleError, Result};

/// Directory holding project configuration.
pub const CONFIG_DIR: &str = ".muzzle";

/// Project configuration file name.
pub const CONFIG_FILE: &str = "config.yml";

/// Local override file name, usually git-ignored.
pub const LOCAL_CONFIG_FILE: &str = "config.local.yml";

/// Paths to configuration files in merge order (later overrides earlier).
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project config: .muzzle/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .muzzle/config.local.yml
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        let dir = project_root.join(CONFIG_DIR);
        Self {
            project: existing(dir.join(CONFIG_FILE)),
            project_local: existing(dir.join(LOCAL_CONFIG_FILE)),
        }
    }

    /// Where the project config lives, whether or not it exists.
    pub fn project_path(project_root: &Path) -> PathBuf {
        project_root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project.iter().chain(self.project_local.iter()).collect()
    }

    /// Check if the project config exists.
    pub fn has_project_config(&self) -> bool {
        self.project.is_some()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.exists().then_some(path)
}

/// Walk up from `start` to the nearest directory holding `.muzzle/`,
/// falling back to the nearest `.git` root.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut git_root = None;
    for dir in start.ancestors() {
        if dir.join(CONFIG_DIR).is_dir() {
            return Some(dir.to_path_buf());
        }
        if git_root.is_none() && dir.join(".git").exists() {
            git_root = Some(dir.to_path_buf());
        }
    }
    git_root
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MuzzleError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            MuzzleError::Io(e)
        }
    })
}

/// Load and parse one config file.
///
/// # Errors
///
/// `ConfigNotFound` if the file doesn't exist, `ConfigParseError` if the
/// YAML does not match the schema.
pub fn load_config_file(path: &Path) -> Result<MuzzleConfig> {
    parse_config(&read(path)?, path)
}

/// Parse YAML content, reporting errors against `source_path`.
pub fn parse_config(content: &str, source_path: &Path) -> Result<MuzzleConfig> {
    if content.trim().is_empty() {
        return Ok(MuzzleConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| MuzzleError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a config file as a raw YAML value, for merging.
///
/// Plain scalars YAML would read as floats keep their source text, so a
/// version written `2.10` is not merged as `2.1`.
pub fn load_config_value(path: &Path) -> Result<Value> {
    let content = read(path)?;
    if content.trim().is_empty() {
        return Ok(Value::Null);
    }
    let parse_error = |e: serde_yaml::Error| MuzzleError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let shape: Value = serde_yaml::from_str(&content).map_err(parse_error)?;
    SourceText(&shape)
        .deserialize(serde_yaml::Deserializer::from_str(&content))
        .map_err(parse_error)
}

/// Load the project config with local overrides laid on top.
///
/// # Errors
///
/// `ConfigNotFound` if `.muzzle/config.yml` does not exist.
pub fn load_merged_config(project_root: &Path) -> Result<MuzzleConfig> {
    let paths = ConfigPaths::discover(project_root);
    let Some(project) = &paths.project else {
        return Err(MuzzleError::ConfigNotFound {
            path: ConfigPaths::project_path(project_root),
        });
    };
    if paths.project_local.is_none() {
        return load_config_file(project);
    }

    let layers = paths
        .all_existing()
        .into_iter()
        .map(|path| {
            debug!("Loading config layer {}", path.display());
            load_config_value(path)
        })
        .collect::<Result<Vec<_>>>()?;

    // Re-read as text so each field gets its typed deserializer.
    let merge_error = |e: serde_yaml::Error| MuzzleError::ConfigParseError {
        path: project.clone(),
        message: format!("Failed to parse merged config: {}", e),
    };
    let merged = serde_yaml::to_string(&merge_configs(&layers)).map_err(merge_error)?;
    serde_yaml::from_str(&merged).map_err(merge_error)
}

/// Re-reads a document guided by its already parsed shape, taking float
/// scalars as their source text.
struct SourceText<'a>(&'a Value);

impl<'de> DeserializeSeed<'de> for SourceText<'_> {
    type Value = Value;

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        match self.0 {
            Value::Mapping(shape) => deserializer.deserialize_map(MappingText(shape)),
            Value::Sequence(shape) => deserializer.deserialize_seq(SequenceText(shape)),
            Value::Number(n) if n.is_f64() => String::deserialize(deserializer).map(Value::String),
            _ => Value::deserialize(deserializer),
        }
    }
}

struct MappingText<'a>(&'a Mapping);

impl<'de> Visitor<'de> for MappingText<'_> {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a YAML mapping")
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut mapping = Mapping::new();
        while let Some(key) = access.next_key::<Value>()? {
            let value = match self.0.get(&key) {
                Some(shape) => access.next_value_seed(SourceText(shape))?,
                None => access.next_value()?,
            };
            mapping.insert(key, value);
        }
        Ok(Value::Mapping(mapping))
    }
}

struct SequenceText<'a>(&'a [Value]);

impl<'de> Visitor<'de> for SequenceText<'_> {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a YAML sequence")
    }

    fn visit_seq<A>(self, mut access: A) -> std::result::Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(self.0.len());
        for shape in self.0 {
            match access.next_element_seed(SourceText(shape))? {
                Some(item) => items.push(item),
                None => break,
            }
        }
        while let Some(item) = access.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }
}

/// Load `config_override` alone when given, else the merged project config.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<MuzzleConfig> {
    match config_override {
        Some(path) => load_config_file(path),
        None => load_merged_config(project_root),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_project(config: &str, local: Option<&str>) -> TempDir {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(CONFIG_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE), config).unwrap();
        if let Some(local) = local {
            fs::write(dir.join(LOCAL_CONFIG_FILE), local).unwrap();
        }
        temp
    }

    #[test]
    fn discover_finds_project_and_local() {
        let temp = setup_project("name: lambda", Some(""));
        let paths = ConfigPaths::discover(temp.path());
        assert!(paths.has_project_config());
        assert!(paths.project_local.is_some());
        assert_eq!(paths.all_existing().len(), 2);
    }

    #[test]
    fn discover_without_configs() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::discover(temp.path());
        assert!(!paths.has_project_config());
        assert!(paths.all_existing().is_empty());
    }

    #[test]
    fn find_project_root_prefers_muzzle_dir() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("instrumentation").join("aws-lambda");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();
        fs::create_dir_all(nested.join(CONFIG_DIR)).unwrap();

        assert_eq!(find_project_root(&nested), Some(nested.clone()));
        assert_eq!(
            find_project_root(&temp.path().join("instrumentation")),
            Some(temp.path().to_path_buf())
        );
    }

    #[test]
    fn load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/.muzzle/config.yml"));
        assert!(matches!(result, Err(MuzzleError::ConfigNotFound { .. })));
    }

    #[test]
    fn parse_config_reports_bad_yaml() {
        let result = parse_config("rules: [", Path::new("config.yml"));
        assert!(matches!(result, Err(MuzzleError::ConfigParseError { .. })));
    }

    #[test]
    fn parse_config_accepts_empty_file() {
        let config = parse_config("", Path::new("config.yml")).unwrap();
        assert!(config.rules.is_empty());
    }

    #[test]
    fn merged_config_applies_local_overrides() {
        let temp = setup_project(
            r#"
name: lambda-core
settings:
  parallel: false
rules:
  - group: com.amazonaws
    module: aws-lambda-java-core
    versions: "[1.0.0,)"
resolved:
  com.amazonaws:aws-lambda-java-core: 1.2.1
"#,
            Some("settings:\n  parallel: true\nresolved:\n  com.amazonaws:aws-lambda-java-core: 1.0.0\n"),
        );

        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config.name.as_deref(), Some("lambda-core"));
        assert!(config.settings.parallel);
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.resolved["com.amazonaws:aws-lambda-java-core"], "1.0.0");
    }

    #[test]
    fn merged_config_keeps_unquoted_trailing_zeros() {
        let temp = setup_project(
            r#"
rules:
  - group: com.amazonaws
    module: aws-lambda-java-events
    versions: "[2.0,)"
    skip_versions: [2.10]
catalog:
  - artifact: com.amazonaws:aws-lambda-java-events
    releases: [2.10, 1.20]
    symbols:
      - symbol: com.amazonaws.services.lambda.runtime.events.SQSEvent
        since: 1.20
resolved:
  com.amazonaws:aws-lambda-java-events: 2.10
  com.amazonaws:aws-lambda-java-core: 1
"#,
            Some("settings:\n  max_parallel: 2\nresolved:\n  com.amazonaws:aws-lambda-java-core: 1.20\n"),
        );

        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config.settings.max_parallel, 2);
        assert_eq!(config.rules[0].skip_versions, vec!["2.10"]);
        assert_eq!(config.catalog[0].releases, vec!["2.10", "1.20"]);
        assert_eq!(config.catalog[0].symbols[0].since.as_deref(), Some("1.20"));
        assert_eq!(config.resolved["com.amazonaws:aws-lambda-java-events"], "2.10");
        assert_eq!(config.resolved["com.amazonaws:aws-lambda-java-core"], "1.20");
    }

    #[test]
    fn config_value_keeps_float_text() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "resolved:\n  g:m: 2.10\nsettings:\n  max_parallel: 8\n").unwrap();

        let value = load_config_value(&path).unwrap();
        assert_eq!(value["resolved"]["g:m"], Value::String("2.10".to_string()));
        assert_eq!(value["settings"]["max_parallel"], 8);
    }

    #[test]
    fn merged_config_tolerates_empty_local_file() {
        let temp = setup_project("name: lambda-core\n", Some(""));
        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config.name.as_deref(), Some("lambda-core"));
    }

    #[test]
    fn merged_config_requires_project_config() {
        let temp = TempDir::new().unwrap();
        let result = load_merged_config(temp.path());
        assert!(matches!(result, Err(MuzzleError::ConfigNotFound { .. })));
    }

    #[test]
    fn override_path_skips_merge() {
        let temp = setup_project("name: project\n", Some("name: local\n"));
        let custom = temp.path().join("custom.yml");
        fs::write(&custom, "name: custom\n").unwrap();

        let config = load_config(temp.path(), Some(&custom)).unwrap();
        assert_eq!(config.name.as_deref(), Some("custom"));
        let merged = load_config(temp.path(), None).unwrap();
        assert_eq!(merged.name.as_deref(), Some("local"));
    }
}
