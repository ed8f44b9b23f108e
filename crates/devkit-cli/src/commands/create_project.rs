//! Implementation of `create-project`.
//!
//! Responsibility: translate CLI arguments into a `ScaffoldRequest`, call the
//! core scaffold service, and display the step report. No business logic
//! lives here.

use tracing::{info, instrument};

use devkit_adapters::{GitCliFetcher, LocalFilesystem};
use devkit_core::{
    application::{ScaffoldReport, ScaffoldRequest, ScaffoldService, StepOutcome, StepStatus},
    domain::{Platform, ProjectName},
};

use crate::{
    cli::ScaffoldCli,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute `create-project`.
///
/// Only an invalid project name or an uncreatable project directory fail the
/// command. Every later step is reported and the command still succeeds.
#[instrument(skip_all, fields(project = %args.project_name))]
pub fn execute(args: ScaffoldCli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let project_name =
        ProjectName::parse(args.project_name.as_str()).map_err(|e| CliError::Core(e.into()))?;
    let platform = Platform::from(args.platform);
    let request = ScaffoldRequest::new(project_name, platform, &args.destination);

    let service = build_service(&config);

    output.header(&format!(
        "Creating '{}' for {} in {}",
        request.project_name,
        platform,
        args.destination.display()
    ))?;
    output.info(&format!("Cloning repository: {}", service.repository()))?;

    let report = service
        .scaffold(&request)
        .with_cli_context(|| "scaffolding failed")?;

    render_report(&report, &output)?;
    output.report(&report)?;

    info!(
        root = %report.project_root.display(),
        failures = report.failures().count(),
        "create-project finished"
    );
    Ok(())
}

fn build_service(config: &AppConfig) -> ScaffoldService {
    let fetcher = GitCliFetcher::new()
        .with_program(&config.scaffold.git_program)
        .with_depth(config.scaffold.clone_depth);

    ScaffoldService::new(
        Box::new(fetcher),
        Box::new(LocalFilesystem::new()),
        config.scaffold.template_repository.clone(),
    )
}

fn render_report(report: &ScaffoldReport, output: &OutputManager) -> CliResult<()> {
    for StepOutcome { step, status } in &report.steps {
        match status {
            StepStatus::Done { detail } => output.success(detail)?,
            StepStatus::Skipped { reason } => output.warning(&format!("Warning: {reason}"))?,
            StepStatus::Failed { reason } => output.error(&format!("{step} failed: {reason}"))?,
        }
    }

    let failures = report.failures().count();
    output.print("")?;
    if failures == 0 {
        output.success(&format!(
            "Project ready at {}",
            report.project_root.display()
        ))?;
    } else {
        output.warning(&format!(
            "Project created at {} with {failures} failed step(s)",
            report.project_root.display()
        ))?;
    }
    Ok(())
}
