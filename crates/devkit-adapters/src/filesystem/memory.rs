//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use devkit_core::{
    application::{
        ApplicationError,
        ports::{CopySummary, Filesystem},
    },
    error::DevkitResult,
};

/// In-memory filesystem for testing.
///
/// Paths are stored as given; no normalisation is applied, so callers should
/// build paths with `Path::join` the way the services do.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<Vec<u8>> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// Seed a file, creating its parent directories.
    pub fn insert_file(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        let path = path.into();
        if let Ok(mut inner) = self.inner.write() {
            if let Some(parent) = path.parent() {
                inner.add_ancestors(parent);
            }
            inner.files.insert(path, content.into());
        }
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn read(&self) -> DevkitResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        Ok(self
            .inner
            .read()
            .map_err(|_| ApplicationError::LockPoisoned)?)
    }

    fn write(&self) -> DevkitResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        Ok(self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?)
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFilesystemInner {
    fn add_ancestors(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.directories.contains(path)
    }
}

fn not_found(path: &Path, what: &str) -> ApplicationError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("{what} does not exist"),
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> DevkitResult<()> {
        let mut inner = self.write()?;
        if inner.files.contains_key(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "A file exists at this path".into(),
            }
            .into());
        }
        inner.add_ancestors(path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> DevkitResult<()> {
        let mut inner = self.write()?;

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.is_dir(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> DevkitResult<String> {
        let inner = self.read()?;
        let bytes = inner.files.get(path).ok_or_else(|| not_found(path, "File"))?;
        String::from_utf8(bytes.clone()).map_err(|e| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: format!("Invalid UTF-8: {e}"),
            }
            .into()
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.files.contains_key(path) || inner.is_dir(path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.read().map(|inner| inner.is_dir(path)).unwrap_or(false)
    }

    fn remove_file(&self, path: &Path) -> DevkitResult<()> {
        let mut inner = self.write()?;
        inner
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| not_found(path, "File").into())
    }

    fn remove_dir_all(&self, path: &Path) -> DevkitResult<()> {
        let mut inner = self.write()?;
        if !inner.is_dir(path) {
            return Err(not_found(path, "Directory").into());
        }

        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn list_entry_names(&self, dir: &Path) -> DevkitResult<Vec<String>> {
        let inner = self.read()?;
        if !inner.is_dir(dir) {
            return Err(not_found(dir, "Directory").into());
        }

        let direct_child = |p: &PathBuf| -> Option<String> {
            (p.parent() == Some(dir))
                .then(|| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .flatten()
        };

        let mut names: Vec<String> = inner
            .directories
            .iter()
            .chain(inner.files.keys())
            .filter_map(direct_child)
            .collect();
        names.sort();
        Ok(names)
    }

    fn copy_dir_contents(&self, from: &Path, to: &Path) -> DevkitResult<CopySummary> {
        let mut inner = self.write()?;
        if !inner.is_dir(from) {
            return Err(not_found(from, "Directory").into());
        }

        let rebase = |p: &Path| p.strip_prefix(from).ok().map(|rel| to.join(rel));
        let directories: Vec<PathBuf> = inner
            .directories
            .iter()
            .filter(|p| p.as_path() != from)
            .filter_map(|p| rebase(p))
            .collect();
        let files: Vec<(PathBuf, Vec<u8>)> = inner
            .files
            .iter()
            .filter_map(|(p, bytes)| rebase(p).map(|target| (target, bytes.clone())))
            .collect();

        let summary = CopySummary {
            files: files.len(),
            directories: directories.len(),
            symlinks: 0,
        };

        inner.add_ancestors(to);
        for dir in directories {
            inner.directories.insert(dir);
        }
        inner.files.extend(files);

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/p/a.txt"), b"x").is_err());

        fs.create_dir_all(Path::new("/p")).unwrap();
        fs.write_file(Path::new("/p/a.txt"), b"x").unwrap();
        assert_eq!(fs.read_file(Path::new("/p/a.txt")).unwrap(), b"x");
    }

    #[test]
    fn copy_rebases_tree_and_overwrites() {
        let fs = MemoryFilesystem::new();
        fs.insert_file("/tpl/arch/ios/GEMINI.md", "# iOS");
        fs.insert_file("/tpl/arch/ios/App/main.swift", "print()");
        fs.insert_file("/proj/GEMINI.md", "stale");

        let summary = fs
            .copy_dir_contents(Path::new("/tpl/arch/ios"), Path::new("/proj"))
            .unwrap();

        assert_eq!(summary.files, 2);
        assert_eq!(summary.directories, 1);
        assert_eq!(fs.read_to_string(Path::new("/proj/GEMINI.md")).unwrap(), "# iOS");
        assert!(fs.is_dir(Path::new("/proj/App")));
        assert!(fs.exists(Path::new("/proj/App/main.swift")));
    }

    #[test]
    fn list_entry_names_only_direct_children() {
        let fs = MemoryFilesystem::new();
        fs.insert_file("/in/b.png", "1");
        fs.insert_file("/in/a.jpg", "2");
        fs.insert_file("/in/nested/c.png", "3");

        let names = fs.list_entry_names(Path::new("/in")).unwrap();
        assert_eq!(names, vec!["a.jpg", "b.png", "nested"]);
    }

    #[test]
    fn remove_dir_all_drops_descendants() {
        let fs = MemoryFilesystem::new();
        fs.insert_file("/tmp/checkout/arch/ios/x", "x");
        fs.insert_file("/tmp/other", "y");

        fs.remove_dir_all(Path::new("/tmp/checkout")).unwrap();
        assert!(!fs.exists(Path::new("/tmp/checkout")));
        assert!(!fs.exists(Path::new("/tmp/checkout/arch/ios/x")));
        assert!(fs.exists(Path::new("/tmp/other")));
    }

    #[test]
    fn remove_missing_file_errors() {
        let fs = MemoryFilesystem::new();
        assert!(fs.remove_file(Path::new("/nope")).is_err());
    }
}
