//! Template checkout through the `git` command-line client.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use devkit_core::{
    application::{ApplicationError, ports::TemplateFetcher},
    error::DevkitResult,
};

/// Clones the template repository by running `git clone` as a subprocess.
///
/// Output is captured rather than inherited so the caller decides what to
/// show; git's stderr ends up in the error reason on failure.
#[derive(Debug, Clone)]
pub struct GitCliFetcher {
    program: PathBuf,
    depth: Option<u32>,
}

impl GitCliFetcher {
    /// Fetcher using the `git` found on `PATH` with a full clone.
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("git"),
            depth: None,
        }
    }

    /// Use a different executable in place of `git`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Shallow clone with the given history depth.
    pub fn with_depth(mut self, depth: Option<u32>) -> Self {
        self.depth = depth;
        self
    }

    fn command(&self, repository: &str, destination: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("clone");
        if let Some(depth) = self.depth {
            cmd.arg("--depth").arg(depth.to_string());
        }
        cmd.arg(repository).arg(destination);
        cmd
    }
}

impl Default for GitCliFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateFetcher for GitCliFetcher {
    fn fetch(&self, repository: &str, destination: &Path) -> DevkitResult<()> {
        info!(repository, destination = %destination.display(), "Cloning template");

        let output = self
            .command(repository, destination)
            .output()
            .map_err(|e| ApplicationError::TemplateFetch {
                repository: repository.to_string(),
                reason: format!("could not run {}: {e}", self.program.display()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.trim() {
                "" => format!("git exited with {}", output.status),
                message => message.to_string(),
            };
            return Err(ApplicationError::TemplateFetch {
                repository: repository.to_string(),
                reason,
            }
            .into());
        }

        debug!("Template cloned");
        Ok(())
    }
}
