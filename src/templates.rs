//! Starter configurations embedded at compile time.

use include_dir::{include_dir, Dir};

use crate::error::{MuzzleError, Result};

static TEMPLATES_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Template written by `muzzle init` when none is named.
pub const DEFAULT_TEMPLATE: &str = "aws-lambda-core";

/// Names of the embedded templates, sorted.
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = TEMPLATES_DIR
        .files()
        .filter(|f| f.path().extension().is_some_and(|ext| ext == "yml"))
        .filter_map(|f| f.path().file_stem()?.to_str())
        .collect();
    names.sort_unstable();
    names
}

/// Content of the template called `name`.
pub fn get(name: &str) -> Result<&'static str> {
    let path = format!("{}.yml", name);
    let file = TEMPLATES_DIR
        .get_file(&path)
        .ok_or_else(|| MuzzleError::ConfigValidationError {
            message: format!(
                "Unknown template '{}'. Available: {}",
                name,
                names().join(", ")
            ),
        })?;
    file.contents_utf8()
        .ok_or_else(|| MuzzleError::ConfigParseError {
            path: format!("templates/{}", path).into(),
            message: "Invalid UTF-8".to_string(),
        })
}
