//! Command handlers, one per binary.
//!
//! Each handler translates parsed arguments into a core request, runs the
//! service with production adapters and renders the returned report.

pub mod create_project;
pub mod resize_and_crop;
