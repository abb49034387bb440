//! Loading the project configuration for a command.

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use crate::config::{load_config, validate_config, MuzzleConfig, CONFIG_DIR};
use crate::error::{MuzzleError, Result};
use crate::report::{render, Diagnostic, OutputFormat, Summary};
use crate::ui::{OutputMode, UserInterface};

use super::dispatcher::CommandResult;

/// Where a command finds its configuration.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config_override: Option<PathBuf>,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config_override: None,
        }
    }

    pub fn with_config_override(mut self, path: Option<PathBuf>) -> Self {
        self.config_override = path;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for fetched repository metadata.
    pub fn cache_dir(&self) -> PathBuf {
        self.root.join(CONFIG_DIR).join("cache")
    }

    /// Load the configuration, or decide the command's exit.
    ///
    /// A missing config breaks with exit code 2 and a parse error with 1,
    /// both reported through `ui`. The config's `default_output` is applied
    /// when no verbosity flag was given.
    pub fn load(&self, ui: &mut dyn UserInterface) -> Result<ControlFlow<CommandResult, MuzzleConfig>> {
        let config = match load_config(&self.root, self.config_override.as_deref()) {
            Ok(config) => config,
            Err(MuzzleError::ConfigNotFound { .. }) => {
                ui.error("No configuration found. Run 'muzzle init' first.");
                return Ok(ControlFlow::Break(CommandResult::failure(2)));
            }
            Err(MuzzleError::ConfigParseError { path, message }) => {
                ui.error(&format!("Parse error in {}: {}", path.display(), message));
                return Ok(ControlFlow::Break(CommandResult::failure(1)));
            }
            Err(e) => return Err(e),
        };

        if ui.output_mode() == OutputMode::Normal {
            ui.set_output_mode(config.settings.default_output.into());
        }
        Ok(ControlFlow::Continue(config))
    }

    /// Load and validate. Warnings are shown; any error breaks with exit code 1.
    pub fn load_valid(
        &self,
        ui: &mut dyn UserInterface,
        show_warnings: bool,
    ) -> Result<ControlFlow<CommandResult, MuzzleConfig>> {
        let config = match self.load(ui)? {
            ControlFlow::Continue(config) => config,
            ControlFlow::Break(result) => return Ok(ControlFlow::Break(result)),
        };

        let mut has_errors = false;
        for finding in validate_config(&config) {
            let line = match &finding.location {
                Some(at) => format!("{} [{}]: {}", at, finding.rule, finding.message),
                None => format!("[{}]: {}", finding.rule, finding.message),
            };
            if finding.is_error() {
                has_errors = true;
                ui.error(&line);
            } else if show_warnings {
                ui.warning(&line);
            }
        }

        if has_errors {
            return Ok(ControlFlow::Break(CommandResult::failure(1)));
        }
        Ok(ControlFlow::Continue(config))
    }
}

/// Write a report through `ui`.
///
/// Human output goes line by line so errors and warnings get the UI's
/// styling. JSON and SARIF are written as one message.
pub fn emit_report(
    ui: &mut dyn UserInterface,
    format: OutputFormat,
    diagnostics: &[Diagnostic],
    summary: &Summary,
) {
    let show_hints = ui.output_mode().shows_hints();
    let output = render(format, diagnostics, summary, false, show_hints);
    if format != OutputFormat::Human {
        ui.message(output.trim_end());
        return;
    }
    for line in output.lines() {
        if line.starts_with("error") {
            ui.error(line);
        } else if line.starts_with("warning") {
            ui.warning(line);
        } else {
            ui.message(line);
        }
    }
}
