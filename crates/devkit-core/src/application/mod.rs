//! Application layer for devkit.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ScaffoldService, TransformService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Reports**: Per-step and per-file outcomes handed back to the CLI
//! - **Errors**: Application-specific error types
//!
//! The application layer sequences the domain logic and the ports. Partial
//! failure is never signalled by early return: steps and files that fail are
//! recorded in the report and the run carries on.

pub mod error;
pub mod ports;
pub mod report;
pub mod services;

// Re-export main services
pub use services::{ScaffoldRequest, ScaffoldService, TransformService};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, ImageCodec, ImageCompressor, TemplateFetcher};

pub use error::{ApplicationError, CompressionError};
pub use report::{
    BatchReport, CompressionOutcome, FileOutcome, FileStatus, ScaffoldReport, ScaffoldStep,
    StepOutcome, StepStatus,
};
