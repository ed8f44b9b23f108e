//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `devkit-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `TemplateFetcher`: Template repository checkout
//!   - `ImageCodec`: Decode, resize, crop and encode images
//!   - `ImageCompressor`: Remote compression service
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{CopySummary, Filesystem, ImageCodec, ImageCompressor, TemplateFetcher};

#[cfg(test)]
pub use output::{MockFilesystem, MockImageCompressor, MockTemplateFetcher};
