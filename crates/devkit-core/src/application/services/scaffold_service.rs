//! Scaffold Service - creates a project from the template repository.
//!
//! Workflow:
//! 1. Create `<destination>/<project>` (the only fatal step)
//! 2. Check out the template repository into a scratch directory
//! 3. Copy `arch/<platform>/` into the project root
//! 4. Remove the scratch checkout
//! 5. Generate `.cursor/rules/<platform>4dev.mdc` from `GEMINI.md`
//! 6. Create the empty `docs/` and `audit/` directories
//!
//! Steps 2-6 record their outcome in the [`ScaffoldReport`] and never stop
//! the steps after them.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateFetcher},
        report::{ScaffoldReport, ScaffoldStep, StepStatus},
        services::scratch::Scratch,
    },
    domain::{Platform, ProjectName, RULE_SOURCE_FILE, render_rule_file},
    error::DevkitResult,
};

/// What to scaffold and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldRequest {
    pub project_name: ProjectName,
    pub platform: Platform,
    /// Directory the project directory is created in.
    pub destination: PathBuf,
}

impl ScaffoldRequest {
    pub fn new(
        project_name: ProjectName,
        platform: Platform,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            project_name,
            platform,
            destination: destination.into(),
        }
    }

    pub fn project_root(&self) -> PathBuf {
        self.destination.join(self.project_name.as_str())
    }

    /// Scratch checkout location, next to the project directory.
    fn checkout_dir(&self) -> PathBuf {
        self.destination
            .join(format!(".{}-template-checkout", self.project_name))
    }
}

/// Main scaffolding service.
pub struct ScaffoldService {
    fetcher: Box<dyn TemplateFetcher>,
    filesystem: Box<dyn Filesystem>,
    repository: String,
}

impl ScaffoldService {
    pub fn new(
        fetcher: Box<dyn TemplateFetcher>,
        filesystem: Box<dyn Filesystem>,
        repository: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            filesystem,
            repository: repository.into(),
        }
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Scaffold a new project.
    ///
    /// Returns `Err` only when the project directory itself cannot be created;
    /// every later failure is reported in the returned [`ScaffoldReport`].
    #[instrument(
        skip_all,
        fields(
            project = %request.project_name,
            platform = %request.platform,
            destination = %request.destination.display()
        )
    )]
    pub fn scaffold(&self, request: &ScaffoldRequest) -> DevkitResult<ScaffoldReport> {
        let root = request.project_root();

        // 1. Project root - fatal on failure
        self.filesystem.create_dir_all(&root)?;
        info!(path = %root.display(), "Created project directory");

        let mut report = ScaffoldReport::new(root.clone(), request.platform);
        report.record(
            ScaffoldStep::CreateProjectDir,
            StepStatus::done(format!("Created directory: {}", root.display())),
        );

        // 2-4. Template checkout and copy
        self.install_template(request, &root, &mut report);

        // 5. Rule file
        let status = match self.write_rule_file(&root, request.platform) {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "Rule file generation failed");
                StepStatus::failed(e)
            }
        };
        report.record(ScaffoldStep::RuleFile, status);

        // 6. Auxiliary directories
        for (step, name) in [(ScaffoldStep::DocsDir, "docs"), (ScaffoldStep::AuditDir, "audit")] {
            let status = self.create_aux_dir(&root.join(name));
            report.record(step, status);
        }

        info!(failures = report.failures().count(), "Scaffold finished");
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn install_template(&self, request: &ScaffoldRequest, root: &Path, report: &mut ScaffoldReport) {
        let checkout_path = request.checkout_dir();

        // A checkout left behind by an interrupted run would make the clone fail.
        if self.filesystem.exists(&checkout_path) {
            warn!(path = %checkout_path.display(), "Removing stale template checkout");
            if let Err(e) = self.filesystem.remove_dir_all(&checkout_path) {
                warn!(error = %e, "Could not remove stale checkout");
            }
        }

        let checkout = Scratch::directory(self.filesystem.as_ref(), checkout_path);

        info!(repository = %self.repository, "Cloning template repository");
        match self.fetcher.fetch(&self.repository, checkout.path()) {
            Ok(()) => {
                report.record(
                    ScaffoldStep::FetchTemplate,
                    StepStatus::done(format!("Cloned repository: {}", self.repository)),
                );
                let status = match self.copy_platform_tree(checkout.path(), root, request.platform)
                {
                    Ok(detail) => StepStatus::done(detail),
                    Err(e) => {
                        warn!(error = %e, "Template copy failed");
                        StepStatus::failed(e)
                    }
                };
                report.record(ScaffoldStep::CopyTemplate, status);
            }
            Err(e) => {
                warn!(error = %e, "Template fetch failed");
                report.record(ScaffoldStep::FetchTemplate, StepStatus::failed(e));
                report.record(
                    ScaffoldStep::CopyTemplate,
                    StepStatus::skipped("template repository was not fetched"),
                );
            }
        }

        let display = checkout.path().display().to_string();
        let status = match checkout.remove() {
            Ok(()) => StepStatus::done(format!("Cleaned up temporary directory: {display}")),
            Err(e) => {
                warn!(error = %e, "Checkout cleanup failed");
                StepStatus::failed(e)
            }
        };
        report.record(ScaffoldStep::CleanupCheckout, status);
    }

    fn copy_platform_tree(
        &self,
        checkout: &Path,
        root: &Path,
        platform: Platform,
    ) -> DevkitResult<String> {
        let source = checkout.join(platform.template_dir());
        if !self.filesystem.is_dir(&source) {
            return Err(ApplicationError::TemplateSubtreeMissing { path: source }.into());
        }

        let summary = self.filesystem.copy_dir_contents(&source, root)?;
        info!(
            files = summary.files,
            directories = summary.directories,
            symlinks = summary.symlinks,
            "Copied template subtree"
        );
        Ok(format!(
            "Copied contents of {} to {} ({} entries)",
            platform.template_dir().display(),
            root.display(),
            summary.total()
        ))
    }

    fn write_rule_file(&self, root: &Path, platform: Platform) -> DevkitResult<StepStatus> {
        let rules_dir = root.join(".cursor").join("rules");
        self.filesystem.create_dir_all(&rules_dir)?;

        let source_path = root.join(RULE_SOURCE_FILE);
        if !self.filesystem.exists(&source_path) {
            warn!(path = %source_path.display(), "Rule source not found, skipping");
            return Ok(StepStatus::skipped(format!(
                "{RULE_SOURCE_FILE} not found in project root, skipping rule creation"
            )));
        }

        let source = self.filesystem.read_to_string(&source_path)?;
        let rule_path = rules_dir.join(platform.rule_file_name());
        self.filesystem
            .write_file(&rule_path, render_rule_file(&source).as_bytes())?;

        info!(path = %rule_path.display(), "Rule file written");
        Ok(StepStatus::done(format!(
            "Copied {RULE_SOURCE_FILE} to {} and added header",
            rule_path.display()
        )))
    }

    fn create_aux_dir(&self, path: &Path) -> StepStatus {
        match self.filesystem.create_dir_all(path) {
            Ok(()) => StepStatus::done(format!("Created directory: {}", path.display())),
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Directory creation failed");
                StepStatus::failed(e)
            }
        }
    }
}
