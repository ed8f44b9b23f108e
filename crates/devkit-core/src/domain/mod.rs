//! Core domain layer for devkit.
//!
//! This module contains pure logic with ZERO I/O. Everything that touches the
//! filesystem, the network or an image library is reached through the ports
//! defined in the application layer.
//!
//! - **No I/O**: No filesystem, network, or external calls
//! - **No external crates**: Only std library + thiserror + serde derives
//! - **Value objects**: `Platform`, `ProjectName`, `Dimensions`, `ImageKind`
//!   are `Clone + PartialEq` and validated at construction

pub mod error;
pub mod geometry;
pub mod image_kind;
pub mod platform;
pub mod project_name;
pub mod rule_file;

pub use error::{DomainError, ErrorCategory};
pub use geometry::{CropBox, Dimensions, ResizePlan, TARGET_SIZE};
pub use image_kind::ImageKind;
pub use platform::Platform;
pub use project_name::ProjectName;
pub use rule_file::{RULE_SOURCE_FILE, render_rule_file, rule_description};
