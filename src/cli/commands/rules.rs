//! Rules command implementation.
//!
//! The `muzzle rules` command lists the registered compatibility rules.

use std::ops::ControlFlow;

use serde_json::json;

use crate::cli::args::RulesArgs;
use crate::error::{MuzzleError, Result};
use crate::ui::{Table, UserInterface};
use crate::verifier::{CompatibilityRule, Verifier};

use super::dispatcher::{Command, CommandResult};
use super::project::Project;

/// The rules command implementation.
pub struct RulesCommand<'a> {
    project: &'a Project,
    args: RulesArgs,
}

impl<'a> RulesCommand<'a> {
    pub fn new(project: &'a Project, args: RulesArgs) -> Self {
        Self { project, args }
    }

    pub fn args(&self) -> &RulesArgs {
        &self.args
    }
}

fn rule_json(index: usize, rule: &CompatibilityRule) -> serde_json::Value {
    json!({
        "id": index,
        "name": rule.label(),
        "module": rule.key().to_string(),
        "versions": rule.versions().to_string(),
        "assert": rule.assertion().to_string(),
        "assert_inverse": rule.assert_inverse(),
        "extra_dependencies": rule
            .extra_dependencies()
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>(),
        "excluded_dependencies": rule
            .excluded_dependencies()
            .iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>(),
        "skip_versions": rule
            .skip_versions()
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>(),
    })
}

impl Command for RulesCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = match self.project.load_valid(ui, !self.args.json)? {
            ControlFlow::Continue(config) => config,
            ControlFlow::Break(result) => return Ok(result),
        };
        let verifier = Verifier::from_config(&config)?;

        if self.args.json {
            let rules: Vec<_> = verifier
                .rules()
                .iter()
                .enumerate()
                .map(|(i, rule)| rule_json(i, rule))
                .collect();
            let output =
                serde_json::to_string_pretty(&rules).map_err(|e| MuzzleError::Other(e.into()))?;
            ui.message(&output);
            return Ok(CommandResult::success());
        }

        let mut table = Table::new(["#", "Rule", "Module", "Versions", "Assert", "Extras"]);
        for (i, rule) in verifier.rules().iter().enumerate() {
            let mut assert = rule.assertion().to_string();
            if rule.assert_inverse() {
                assert.push_str(" (+inverse)");
            }
            table.add_row([
                i.to_string(),
                rule.label(),
                rule.key().to_string(),
                rule.versions().to_string(),
                assert,
                rule.extra_dependencies().len().to_string(),
            ]);
        }
        for line in table.render().lines() {
            ui.message(line);
        }
        ui.message("");
        ui.message(&format!("{} rule(s)", table.row_count()));
        Ok(CommandResult::success())
    }
}
