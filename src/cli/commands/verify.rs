//! Verify command implementation.

use std::ops::ControlFlow;

use tracing::debug;

use crate::cli::args::VerifyArgs;
use crate::config::MuzzleConfig;
use crate::error::Result;
use crate::report::{diagnostics_for, OutputFormat, Summary};
use crate::ui::UserInterface;
use crate::verifier::{DependencySet, RuleId, Verifier};

use super::dispatcher::{Command, CommandResult};
use super::project::{emit_report, Project};

/// Verifies every rule against one resolved dependency set.
pub struct VerifyCommand<'a> {
    project: &'a Project,
    args: VerifyArgs,
}

impl<'a> VerifyCommand<'a> {
    pub fn new(project: &'a Project, args: VerifyArgs) -> Self {
        Self { project, args }
    }

    pub fn args(&self) -> &VerifyArgs {
        &self.args
    }

    /// `resolved:` from the config, then `--resolved`, then each `--set`.
    fn dependencies(&self, config: &MuzzleConfig) -> Result<DependencySet> {
        let mut deps = config.dependency_set()?;
        if let Some(path) = &self.args.resolved {
            for (key, version) in DependencySet::load(path)?.iter() {
                deps = deps.with(key.clone(), version.clone());
            }
        }
        for assignment in &self.args.set {
            let (key, version) = DependencySet::parse_assignment(assignment)?;
            deps = deps.with(key, version);
        }
        Ok(deps)
    }
}

impl Command for VerifyCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let human = self.args.format == OutputFormat::Human;
        let config = match self.project.load_valid(ui, human)? {
            ControlFlow::Continue(config) => config,
            ControlFlow::Break(result) => return Ok(result),
        };

        let deps = self.dependencies(&config)?;
        debug!("Verifying against {} resolved module(s)", deps.len());
        let verifier = Verifier::from_config(&config)?;
        let results = match self.args.rule {
            None => verifier.verify(&deps),
            Some(n) => match n.checked_sub(1).and_then(|i| verifier.verify_rule(RuleId(i), &deps)) {
                Some(result) => vec![result],
                None => {
                    ui.error(&format!(
                        "No rule {} (the config declares {})",
                        n,
                        verifier.rules().len()
                    ));
                    return Ok(CommandResult::failure(2));
                }
            },
        };

        let diagnostics = diagnostics_for(&results);
        let summary = Summary::from_results(&results);

        if human {
            let title = config.name.as_deref().unwrap_or("muzzle");
            ui.show_header(&format!("Verifying {}", title));
        }
        emit_report(ui, self.args.format, &diagnostics, &summary);

        if summary.failed > 0 {
            return Ok(CommandResult::failure(1));
        }
        if human {
            if summary.passed == 0 {
                ui.warning("No rule matched the resolved dependencies");
            } else {
                ui.success("All rules pass");
            }
        }
        Ok(CommandResult::success())
    }
}
