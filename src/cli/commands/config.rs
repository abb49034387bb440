//! Config command implementation.
//!
//! The `muzzle config` command shows the merged configuration, or with
//! `--check` validates it.

use std::ops::ControlFlow;

use crate::cli::args::ConfigArgs;
use crate::config::{validate, ConfigPaths};
use crate::error::{MuzzleError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::project::Project;

/// The config command implementation.
pub struct ConfigCommand<'a> {
    project: &'a Project,
    args: ConfigArgs,
}

impl<'a> ConfigCommand<'a> {
    pub fn new(project: &'a Project, args: ConfigArgs) -> Self {
        Self { project, args }
    }

    pub fn args(&self) -> &ConfigArgs {
        &self.args
    }
}

impl Command for ConfigCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = match self.project.load(ui)? {
            ControlFlow::Continue(config) => config,
            ControlFlow::Break(result) => return Ok(result),
        };

        if self.args.check {
            return match validate(&config) {
                Ok(()) => {
                    ui.success("Configuration is valid");
                    Ok(CommandResult::success())
                }
                Err(MuzzleError::ConfigValidationError { message }) => {
                    for problem in message.split("; ") {
                        ui.error(problem);
                    }
                    Ok(CommandResult::failure(1))
                }
                Err(e) => Err(e),
            };
        }

        if !self.args.json {
            let paths = ConfigPaths::discover(self.project.root());
            let existing = paths.all_existing();
            if !existing.is_empty() {
                for path in &existing {
                    ui.message(&format!("# {}", path.display()));
                }
                ui.message("");
            }
        }

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&config).map_err(|e| MuzzleError::Other(e.into()))?;
            ui.message(&json);
        } else {
            let yaml = serde_yaml::to_string(&config).map_err(|e| MuzzleError::Other(e.into()))?;
            ui.message(&yaml);
        }

        Ok(CommandResult::success())
    }
}
