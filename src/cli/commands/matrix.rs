//! Matrix command implementation.

use std::collections::BTreeSet;
use std::ops::ControlFlow;
use std::time::Instant;

use tracing::{debug, warn};

use crate::cli::args::MatrixArgs;
use crate::config::MuzzleConfig;
use crate::error::Result;
use crate::report::{diagnostics_for, OutputFormat, Summary};
use crate::repository::{MavenRepository, MetadataCache};
use crate::ui::{format_duration, OutputMode, Table, UserInterface};
use crate::verifier::{CandidateVersions, MatrixReport, Verifier};
use crate::version::ModuleKey;

use super::dispatcher::{Command, CommandResult};
use super::project::{emit_report, Project};

/// Verifies every rule across sampled versions of its range.
pub struct MatrixCommand<'a> {
    project: &'a Project,
    args: MatrixArgs,
}

impl<'a> MatrixCommand<'a> {
    pub fn new(project: &'a Project, args: MatrixArgs) -> Self {
        Self { project, args }
    }

    pub fn args(&self) -> &MatrixArgs {
        &self.args
    }

    fn candidates(
        &self,
        config: &MuzzleConfig,
        verifier: &Verifier,
        ui: &mut dyn UserInterface,
    ) -> Result<CandidateVersions> {
        let mut candidates = CandidateVersions::new();
        for spec in &self.args.candidate {
            candidates.add_spec(spec)?;
        }
        if self.args.fetch {
            let modules: BTreeSet<&ModuleKey> = verifier.rules().iter().map(|r| r.key()).collect();
            let repository = MavenRepository::new(config.settings.repository_url.as_str())?
                .with_cache(MetadataCache::new(
                    self.project.cache_dir().join("metadata"),
                    config.settings.cache_ttl_secs,
                ));
            for key in modules {
                let mut spinner = ui.start_spinner(&format!("Fetching versions of {}", key));
                match repository.fetch_versions(key) {
                    Ok(versions) => {
                        spinner.finish_success(&format!("{}: {} version(s)", key, versions.len()));
                        candidates.extend(key.clone(), versions);
                    }
                    Err(e) => {
                        spinner.finish_error(&format!("{}: fetch failed", key));
                        warn!("Fetching versions of {} failed: {:#}", key, e);
                        ui.warning(&format!("Could not fetch versions of {}: {}", key, e));
                    }
                }
            }
        }
        Ok(candidates)
    }

    fn show_table(&self, report: &MatrixReport, ui: &mut dyn UserInterface) {
        let mut table = Table::new(["Rule", "Module", "Version", "Expect", "Status"]);
        for result in report.results() {
            table.add_row([
                result.label.clone(),
                result.module.to_string(),
                result.version_label(),
                result.expectation.to_string(),
                result.status().to_string(),
            ]);
        }
        for line in table.render().lines() {
            ui.message(line);
        }
        ui.message("");
    }
}

impl Command for MatrixCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let human = self.args.format == OutputFormat::Human;
        let config = match self.project.load_valid(ui, human)? {
            ControlFlow::Continue(config) => config,
            ControlFlow::Break(result) => return Ok(result),
        };

        let verifier = Verifier::from_config(&config)?;
        let candidates = self.candidates(&config, &verifier, ui)?;
        debug!("Running matrix with {} extra candidate(s)", candidates.len());

        if human {
            let title = config.name.as_deref().unwrap_or("muzzle");
            ui.show_header(&format!("Matrix for {}", title));
        }

        let started = Instant::now();
        let progress = ui.start_progress(verifier.rules().len(), "Verifying rules");
        let report = verifier.run_matrix_with(&candidates, |_| progress.inc());
        progress.finish();

        if human && ui.output_mode() == OutputMode::Verbose {
            self.show_table(&report, ui);
        }

        let diagnostics = diagnostics_for(report.results());
        let summary = Summary::from_report(&report);
        emit_report(ui, self.args.format, &diagnostics, &summary);

        if !report.is_success() {
            return Ok(CommandResult::failure(1));
        }
        if human {
            ui.success(&format!(
                "{} rule(s) compatible across {} sample(s) in {}",
                verifier.rules().len(),
                report.passed(),
                format_duration(started.elapsed())
            ));
        }
        Ok(CommandResult::success())
    }
}
