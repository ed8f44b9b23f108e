//! Application layer errors.
//!
//! These errors represent failures of collaborators (filesystem, git, image
//! library, compression service), not invalid input. Input errors are
//! `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while talking to the outside world.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The template repository could not be fetched.
    #[error("Failed to fetch template repository {repository}: {reason}")]
    TemplateFetch { repository: String, reason: String },

    /// The fetched template has no subtree for the requested platform.
    #[error("Source directory {path} not found in template")]
    TemplateSubtreeMissing { path: PathBuf },

    /// Decoding or encoding an image failed.
    #[error("Image error for {path}: {reason}")]
    ImageCodec { path: PathBuf, reason: String },

    /// Shared state lock was poisoned (in-memory adapters).
    #[error("Internal lock poisoned")]
    LockPoisoned,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::TemplateFetch { .. } => vec![
                "Ensure git is installed and in your PATH".into(),
                "Check your network connection".into(),
                "Override the repository with DEVKIT_SCAFFOLD__TEMPLATE_REPOSITORY".into(),
            ],
            Self::TemplateSubtreeMissing { .. } => vec![
                "The template repository has no directory for this platform".into(),
            ],
            Self::ImageCodec { .. } => vec![
                "Check that the file is a valid PNG or JPEG image".into(),
            ],
            Self::LockPoisoned => vec!["Try again".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. } | Self::LockPoisoned => ErrorCategory::Internal,
            Self::TemplateFetch { .. } => ErrorCategory::Internal,
            Self::TemplateSubtreeMissing { .. } => ErrorCategory::NotFound,
            Self::ImageCodec { .. } => ErrorCategory::Validation,
        }
    }
}

/// Why a remote compression attempt did not produce a result.
///
/// Every variant leads to the same fallback (saving the uncompressed image);
/// the distinction only changes the message shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompressionError {
    #[error("API key rejected (401 Unauthorized), check the credential")]
    Unauthorized,

    #[error("rate limit reached (429 Too Many Requests), monthly compression quota is used up")]
    RateLimited,

    #[error("request rejected as malformed (400 Bad Request): {message}")]
    BadRequest { message: String },

    #[error("unexpected response status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    #[error("service response carried no result location")]
    MissingLocation,

    #[error("network error: {message}")]
    Network { message: String },

    #[error("failed to download compressed image: {message}")]
    Download { message: String },

    #[error("failed to read upload source: {message}")]
    Io { message: String },
}
