//! Local filesystem adapter using std::fs.

use std::fs;
use std::io;
use std::path::Path;

use tracing::trace;
use walkdir::WalkDir;

use devkit_core::{
    application::{
        ApplicationError,
        ports::{CopySummary, Filesystem},
    },
    error::{DevkitError, DevkitResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> DevkitResult<()> {
        fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> DevkitResult<()> {
        fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn read_to_string(&self, path: &Path) -> DevkitResult<String> {
        fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn remove_file(&self, path: &Path) -> DevkitResult<()> {
        fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn remove_dir_all(&self, path: &Path) -> DevkitResult<()> {
        fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn list_entry_names(&self, dir: &Path) -> DevkitResult<Vec<String>> {
        let entries = fs::read_dir(dir).map_err(|e| map_io_error(dir, e, "list directory"))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| map_io_error(dir, e, "list directory"))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn copy_dir_contents(&self, from: &Path, to: &Path) -> DevkitResult<CopySummary> {
        let mut summary = CopySummary::default();
        fs::create_dir_all(to).map_err(|e| map_io_error(to, e, "create directory"))?;

        for entry in WalkDir::new(from).min_depth(1).follow_links(false) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(from).to_path_buf();
                map_io_error(&path, io::Error::from(e), "walk template")
            })?;

            let relative = entry
                .path()
                .strip_prefix(from)
                .map_err(|e| DevkitError::Internal {
                    message: format!("walked outside {}: {e}", from.display()),
                })?;
            let target = to.join(relative);
            let file_type = entry.file_type();
            trace!(source = %entry.path().display(), target = %target.display(), "Copying");

            if file_type.is_symlink() {
                copy_symlink(entry.path(), &target)?;
                summary.symlinks += 1;
            } else if file_type.is_dir() {
                fs::create_dir_all(&target)
                    .map_err(|e| map_io_error(&target, e, "create directory"))?;
                summary.directories += 1;
            } else {
                replace_symlink(&target)?;
                fs::copy(entry.path(), &target)
                    .map_err(|e| map_io_error(&target, e, "copy file"))?;
                summary.files += 1;
            }
        }

        Ok(summary)
    }
}

/// Recreate the link at `source` as `target`, pointing at the same place.
fn copy_symlink(source: &Path, target: &Path) -> DevkitResult<()> {
    let link = fs::read_link(source).map_err(|e| map_io_error(source, e, "read link"))?;

    if target.symlink_metadata().is_ok() {
        if target.is_dir() && !target.is_symlink() {
            fs::remove_dir_all(target).map_err(|e| map_io_error(target, e, "replace directory"))?;
        } else {
            fs::remove_file(target).map_err(|e| map_io_error(target, e, "replace file"))?;
        }
    }

    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(&link, target)
            .map_err(|e| map_io_error(target, e, "create symlink"))
    }
    #[cfg(windows)]
    {
        let result = if source.is_dir() {
            std::os::windows::fs::symlink_dir(&link, target)
        } else {
            std::os::windows::fs::symlink_file(&link, target)
        };
        result.map_err(|e| map_io_error(target, e, "create symlink"))
    }
}

/// Writing through an existing link would modify whatever it points to.
fn replace_symlink(target: &Path) -> DevkitResult<()> {
    if target.is_symlink() {
        fs::remove_file(target).map_err(|e| map_io_error(target, e, "replace symlink"))?;
    }
    Ok(())
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> DevkitError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
