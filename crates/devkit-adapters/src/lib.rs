//! Infrastructure adapters for devkit.
//!
//! This crate implements the ports defined in `devkit-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod compression;
pub mod filesystem;
pub mod git;
pub mod imaging;

// Re-export commonly used adapters
pub use compression::TinyPngClient;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use git::GitCliFetcher;
pub use imaging::ImageRsCodec;
