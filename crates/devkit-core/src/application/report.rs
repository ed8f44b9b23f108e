//! Outcomes of a scaffold run and of a transform batch.
//!
//! Steps and files that fail do not abort their run; they end up here with
//! the reason, and the CLI renders the report line by line or as JSON.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::domain::{Dimensions, Platform};

// ── Scaffold ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaffoldStep {
    CreateProjectDir,
    FetchTemplate,
    CopyTemplate,
    CleanupCheckout,
    RuleFile,
    DocsDir,
    AuditDir,
}

impl ScaffoldStep {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateProjectDir => "create project directory",
            Self::FetchTemplate => "fetch template",
            Self::CopyTemplate => "copy template",
            Self::CleanupCheckout => "clean up checkout",
            Self::RuleFile => "generate rule file",
            Self::DocsDir => "create docs directory",
            Self::AuditDir => "create audit directory",
        }
    }
}

impl fmt::Display for ScaffoldStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    Done { detail: String },
    Skipped { reason: String },
    Failed { reason: String },
}

impl StepStatus {
    pub fn done(detail: impl Into<String>) -> Self {
        Self::Done {
            detail: detail.into(),
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    pub fn failed(reason: impl fmt::Display) -> Self {
        Self::Failed {
            reason: reason.to_string(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub step: ScaffoldStep,
    #[serde(flatten)]
    pub status: StepStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaffoldReport {
    pub project_root: PathBuf,
    pub platform: Platform,
    pub steps: Vec<StepOutcome>,
}

impl ScaffoldReport {
    pub(crate) fn new(project_root: PathBuf, platform: Platform) -> Self {
        Self {
            project_root,
            platform,
            steps: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, step: ScaffoldStep, status: StepStatus) {
        self.steps.push(StepOutcome { step, status });
    }

    /// Status of `step`, if it ran.
    pub fn status_of(&self, step: ScaffoldStep) -> Option<&StepStatus> {
        self.steps
            .iter()
            .find(|o| o.step == step)
            .map(|o| &o.status)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|o| o.status.is_failed())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

// ── Transform ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "compression", rename_all = "snake_case")]
pub enum CompressionOutcome {
    /// Compression was not requested.
    Disabled,
    Compressed {
        original_bytes: u64,
        compressed_bytes: u64,
    },
    /// The service failed; the uncompressed image was saved instead.
    FellBack { reason: String },
}

impl CompressionOutcome {
    /// Size reduction in percent for a successful compression.
    pub fn reduction_percent(&self) -> Option<f64> {
        match self {
            Self::Compressed {
                original_bytes,
                compressed_bytes,
            } if *original_bytes > 0 => {
                let saved = *original_bytes as f64 - *compressed_bytes as f64;
                Some(saved / *original_bytes as f64 * 100.0)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Saved {
        output: PathBuf,
        #[serde(flatten)]
        compression: CompressionOutcome,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    /// 1-based position in the batch.
    pub index: usize,
    pub total: usize,
    pub name: String,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self.status, FileStatus::Saved { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub target: Dimensions,
    pub files: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn saved(&self) -> usize {
        self.files.iter().filter(|f| f.is_saved()).count()
    }

    pub fn failed(&self) -> usize {
        self.files.len() - self.saved()
    }
}
