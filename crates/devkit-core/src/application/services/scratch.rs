//! Scratch paths removed when their owner goes out of scope.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::application::ports::Filesystem;
use crate::error::DevkitResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScratchKind {
    File,
    Directory,
}

/// Temporary file or directory owned by a single service call.
///
/// [`Scratch::remove`] deletes it and reports the result; if the owner bails
/// out before that, `Drop` makes a best-effort removal instead.
pub(crate) struct Scratch<'fs> {
    fs: &'fs dyn Filesystem,
    path: PathBuf,
    kind: ScratchKind,
    removed: bool,
}

impl<'fs> Scratch<'fs> {
    pub(crate) fn file(fs: &'fs dyn Filesystem, path: PathBuf) -> Self {
        Self {
            fs,
            path,
            kind: ScratchKind::File,
            removed: false,
        }
    }

    pub(crate) fn directory(fs: &'fs dyn Filesystem, path: PathBuf) -> Self {
        Self {
            fs,
            path,
            kind: ScratchKind::Directory,
            removed: false,
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the scratch path now. Missing paths count as removed.
    pub(crate) fn remove(mut self) -> DevkitResult<()> {
        self.removed = true;
        self.delete()
    }

    fn delete(&self) -> DevkitResult<()> {
        if !self.fs.exists(&self.path) {
            return Ok(());
        }
        debug!(path = %self.path.display(), "Removing scratch path");
        match self.kind {
            ScratchKind::File => self.fs.remove_file(&self.path),
            ScratchKind::Directory => self.fs.remove_dir_all(&self.path),
        }
    }
}

impl Drop for Scratch<'_> {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        if let Err(e) = self.delete() {
            warn!(error = %e, path = %self.path.display(), "Failed to remove scratch path");
        }
    }
}
