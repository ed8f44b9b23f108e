// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel inside reports)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Unknown platform '{0}' (expected ios, flutter or android)")]
    UnknownPlatform(String),

    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Image has empty dimensions {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    // ========================================================================
    // Unsupported input
    // ========================================================================
    #[error("Unsupported image file '{0}' (expected .png, .jpg or .jpeg)")]
    UnsupportedImage(String),

    // ========================================================================
    // Arithmetic limits
    // ========================================================================
    #[error("Scaled dimension {value} does not fit in a pixel count")]
    DimensionOverflow { value: f64 },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownPlatform(_) => vec![
                "Supported platforms:".into(),
                "  • ios".into(),
                "  • flutter".into(),
                "  • android".into(),
            ],
            Self::InvalidProjectName { name, reason } => vec![
                format!("Project name '{}' is invalid: {}", name, reason),
                "Pass the parent directory as the destination argument instead".into(),
                "Examples: my-project, my_app, project123".into(),
            ],
            Self::EmptyImage { .. } => vec!["The image file decodes to zero pixels".into()],
            Self::UnsupportedImage(_) => {
                vec!["Only .png, .jpg and .jpeg files are processed".into()]
            }
            Self::DimensionOverflow { .. } => {
                vec!["The source aspect ratio is too extreme to scale".into()]
            }
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownPlatform(_) | Self::InvalidProjectName { .. } => {
                ErrorCategory::Validation
            }
            Self::EmptyImage { .. } | Self::UnsupportedImage(_) => ErrorCategory::Unsupported,
            Self::DimensionOverflow { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Unsupported,
    Internal,
}
