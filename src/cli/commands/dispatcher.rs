//! Command dispatching.
//!
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, VerifyArgs};
use crate::error::Result;
use crate::ui::UserInterface;

use super::project::Project;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command, reporting through `ui`.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code: 0 success, 1 failure, 2 no configuration.
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project: Project,
}

impl CommandDispatcher {
    /// Create a dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            project: Project::new(project_root),
        }
    }

    /// Load this file instead of the project's merged configuration.
    pub fn with_config_override(mut self, path: Option<PathBuf>) -> Self {
        self.project = self.project.with_config_override(path);
        self
    }

    pub fn project_root(&self) -> &Path {
        self.project.root()
    }

    /// Route the CLI subcommand to its implementation and execute it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Verify(args)) => {
                super::verify::VerifyCommand::new(&self.project, args.clone()).execute(ui)
            }
            Some(Commands::Matrix(args)) => {
                super::matrix::MatrixCommand::new(&self.project, args.clone()).execute(ui)
            }
            Some(Commands::Rules(args)) => {
                super::rules::RulesCommand::new(&self.project, args.clone()).execute(ui)
            }
            Some(Commands::Config(args)) => {
                super::config::ConfigCommand::new(&self.project, args.clone()).execute(ui)
            }
            Some(Commands::Init(args)) => {
                super::init::InitCommand::new(self.project.root(), args.clone()).execute(ui)
            }
            Some(Commands::Schema) => super::schema::SchemaCommand.execute(ui),
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => super::verify::VerifyCommand::new(&self.project, VerifyArgs::default())
                .execute(ui),
        }
    }
}
