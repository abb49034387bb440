//! Init command implementation.
//!
//! The `muzzle init` command writes a starter `.muzzle/config.yml` from one
//! of the embedded templates.

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::args::InitArgs;
use crate::config::ConfigPaths;
use crate::error::Result;
use crate::templates;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Entries kept out of version control.
const GITIGNORE_ENTRIES: &[&str] = &[".muzzle/config.local.yml", ".muzzle/cache/"];

/// The init command implementation.
pub struct InitCommand {
    project_root: PathBuf,
    args: InitArgs,
}

impl InitCommand {
    pub fn new(project_root: &Path, args: InitArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn args(&self) -> &InitArgs {
        &self.args
    }

    fn config_path(&self) -> PathBuf {
        ConfigPaths::project_path(&self.project_root)
    }

    /// Append missing entries to an existing `.gitignore`.
    fn update_gitignore(&self, ui: &mut dyn UserInterface) -> Result<()> {
        let gitignore_path = self.project_root.join(".gitignore");
        if !gitignore_path.exists() {
            return Ok(());
        }

        let mut content = fs::read_to_string(&gitignore_path)?;
        let missing: Vec<&str> = GITIGNORE_ENTRIES
            .iter()
            .copied()
            .filter(|entry| !content.lines().any(|line| line.trim() == *entry))
            .collect();
        if missing.is_empty() {
            return Ok(());
        }

        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        for entry in &missing {
            content.push_str(entry);
            content.push('\n');
        }
        fs::write(&gitignore_path, content)?;
        ui.message(&format!("Added {} to .gitignore", missing.join(", ")));
        Ok(())
    }
}

impl Command for InitCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config_path = self.config_path();
        if config_path.exists() && !self.args.force {
            ui.warning("Configuration already exists. Use --force to overwrite.");
            return Ok(CommandResult::failure(1));
        }

        let name = self
            .args
            .template
            .as_deref()
            .unwrap_or(templates::DEFAULT_TEMPLATE);
        let content = match templates::get(name) {
            Ok(content) => content,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(1));
            }
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&config_path, content)?;
        self.update_gitignore(ui)?;

        ui.success(&format!("Created .muzzle/config.yml from template '{}'", name));
        ui.message("\nNext steps:");
        ui.message("  1. Describe your instrumentation's references and the catalog");
        ui.message("  2. Run `muzzle verify` to check the resolved versions");
        ui.message("  3. Run `muzzle matrix` to check every rule's whole range");

        Ok(CommandResult::success())
    }
}
