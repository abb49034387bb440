//! Schema command implementation.
//!
//! Prints the JSON Schema of `.muzzle/config.yml` for editor integration.

use crate::config::MuzzleConfig;
use crate::error::{MuzzleError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The schema command implementation.
pub struct SchemaCommand;

/// JSON Schema of the configuration file, pretty-printed.
pub fn config_schema() -> Result<String> {
    let schema = schemars::schema_for!(MuzzleConfig);
    serde_json::to_string_pretty(&schema).map_err(|e| MuzzleError::Other(e.into()))
}

impl Command for SchemaCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.message(&config_schema()?);
        Ok(CommandResult::success())
    }
}
