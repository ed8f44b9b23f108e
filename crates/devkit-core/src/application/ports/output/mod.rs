//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `devkit-adapters` crate provides implementations.

use std::path::Path;

#[cfg(test)]
use mockall::automock;

use crate::application::CompressionError;
use crate::domain::{CropBox, Dimensions, ImageKind};
use crate::error::DevkitResult;

/// Counts of entries copied by [`Filesystem::copy_dir_contents`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopySummary {
    pub files: usize,
    pub directories: usize,
    pub symlinks: usize,
}

impl CopySummary {
    pub fn total(&self) -> usize {
        self.files + self.directories + self.symlinks
    }
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `devkit_adapters::filesystem::LocalFilesystem` (production)
/// - `devkit_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> DevkitResult<()>;

    /// Write bytes to a file, replacing any existing content.
    fn write_file(&self, path: &Path, content: &[u8]) -> DevkitResult<()>;

    /// Read a UTF-8 text file.
    fn read_to_string(&self, path: &Path) -> DevkitResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> DevkitResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> DevkitResult<()>;

    /// Names of the entries directly inside `dir`, in listing order.
    ///
    /// The order is whatever the platform yields; callers must not rely on
    /// it being sorted.
    fn list_entry_names(&self, dir: &Path) -> DevkitResult<Vec<String>>;

    /// Copy everything inside `from` into `to`, merging with what is there.
    ///
    /// Symbolic links are recreated as links, not followed. Existing files
    /// are overwritten.
    fn copy_dir_contents(&self, from: &Path, to: &Path) -> DevkitResult<CopySummary>;
}

/// Port for checking out the template repository.
///
/// Implemented by:
/// - `devkit_adapters::GitCliFetcher` (`git clone` subprocess)
#[cfg_attr(test, automock)]
pub trait TemplateFetcher: Send + Sync {
    /// Fetch `repository` into `destination`, which must not exist yet.
    fn fetch(&self, repository: &str, destination: &Path) -> DevkitResult<()>;
}

/// Port for image decoding and pixel operations.
///
/// The decoded representation is left to the adapter; the service only moves
/// it between calls.
///
/// Implemented by:
/// - `devkit_adapters::ImageRsCodec` (the `image` crate)
pub trait ImageCodec {
    type Image;

    fn decode(&self, path: &Path) -> DevkitResult<Self::Image>;

    fn dimensions(&self, image: &Self::Image) -> Dimensions;

    /// Resample to exactly `size` with a Lanczos filter.
    fn resize(&self, image: &Self::Image, size: Dimensions) -> Self::Image;

    fn crop(&self, image: &Self::Image, area: CropBox) -> Self::Image;

    /// Encode in the given on-disk format.
    fn encode(&self, image: &Self::Image, kind: ImageKind) -> DevkitResult<Vec<u8>>;
}

/// Port for the remote compression service.
///
/// Implemented by:
/// - `devkit_adapters::TinyPngClient`
#[cfg_attr(test, automock)]
pub trait ImageCompressor: Send + Sync {
    /// Upload the encoded image at `source` and return the compressed bytes.
    fn compress(&self, source: &Path) -> Result<Vec<u8>, CompressionError>;
}
