//! Devkit Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the two devkit
//! tools: the project scaffolder and the batch screenshot transformer.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │   devkit-cli (create-project,           │
//! │               resize-and-crop)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (ScaffoldService, TransformService)    │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, TemplateFetcher,           │
//! │  ImageCodec, ImageCompressor)           │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     devkit-adapters (Infrastructure)    │
//! │ (LocalFilesystem, GitCliFetcher,        │
//! │  ImageRsCodec, TinyPngClient)           │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Platform, ProjectName, ResizePlan,     │
//! │  rule file rendering)                   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use devkit_core::{
//!     application::{ScaffoldRequest, ScaffoldService},
//!     domain::{Platform, ProjectName},
//! };
//!
//! // Adapters come from `devkit-adapters`.
//! let service = ScaffoldService::new(fetcher, filesystem, "https://example.com/t.git");
//! let request = ScaffoldRequest::new(ProjectName::parse("demo").unwrap(), Platform::Ios, ".");
//! let report = service.scaffold(&request).unwrap();
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, BatchReport, CompressionError, CompressionOutcome, FileOutcome,
        FileStatus, ScaffoldReport, ScaffoldRequest, ScaffoldService, ScaffoldStep, StepOutcome,
        StepStatus, TransformService,
        ports::{Filesystem, ImageCodec, ImageCompressor, TemplateFetcher},
    };
    pub use crate::domain::{
        CropBox, Dimensions, ImageKind, Platform, ProjectName, ResizePlan, TARGET_SIZE,
    };
    pub use crate::error::{DevkitError, DevkitResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
