//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::report::OutputFormat;

/// muzzle - compatibility-matrix verification for instrumentation modules.
#[derive(Debug, Parser)]
#[command(name = "muzzle")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides .muzzle/config.yml, no local merge)
    #[arg(short, long, global = true, env = "MUZZLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output, including skipped samples
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Verify rules against one resolved dependency set (default)
    Verify(VerifyArgs),

    /// Verify every rule across sampled versions of its range
    Matrix(MatrixArgs),

    /// List configured rules
    Rules(RulesArgs),

    /// Show the merged configuration
    Config(ConfigArgs),

    /// Write a starter configuration
    Init(InitArgs),

    /// Print the JSON Schema of the configuration file
    Schema,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `verify` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct VerifyArgs {
    /// YAML file mapping group:module to version, laid over `resolved:`
    #[arg(long, value_name = "FILE")]
    pub resolved: Option<PathBuf>,

    /// Pin a module version, e.g. com.amazonaws:aws-lambda-java-core=1.2.1
    #[arg(long = "set", value_name = "GROUP:MODULE=VERSION")]
    pub set: Vec<String>,

    /// Verify only rule N, numbered as `muzzle rules` lists them
    #[arg(long, value_name = "N")]
    pub rule: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Arguments for the `matrix` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct MatrixArgs {
    /// Extra versions to sample, e.g. com.amazonaws:aws-lambda-java-events=3.11.0,3.11.4
    #[arg(long, value_name = "GROUP:MODULE=V1,V2")]
    pub candidate: Vec<String>,

    /// Also sample versions published in the Maven repository
    #[arg(long)]
    pub fetch: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Arguments for the `rules` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RulesArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Validate the merged configuration instead of printing it
    #[arg(long)]
    pub check: bool,
}

/// Arguments for the `init` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InitArgs {
    /// Starter template (aws-lambda-core, aws-lambda-events)
    #[arg(long)]
    pub template: Option<String>,

    /// Overwrite existing configuration
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
