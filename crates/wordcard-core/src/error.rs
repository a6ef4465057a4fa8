use std::path::PathBuf;

use wordcard_generator::GenerateError;
use wordcard_store::StoreError;

/// Per-item failure. None of these abort a run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Backend error: {0}")]
    Backend(#[from] GenerateError),

    #[error("Storage error at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),

    /// Processing the item panicked
    #[error("Aborted: {0}")]
    Aborted(String),
}

impl PipelineError {
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Storage {
            path: path.into(),
            source,
        }
    }

    /// Short status label used in run reports
    pub fn status(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "validation-failed",
            PipelineError::Backend(_) => "backend-failed",
            PipelineError::Storage { .. } => "storage-failed",
            PipelineError::Persistence(_) => "persistence-failed",
            PipelineError::Aborted(_) => "aborted",
        }
    }
}

/// Image could not be moved to its identity-addressed path; the row stays committed
#[derive(Debug, thiserror::Error)]
pub enum ReconciliationWarning {
    #[error("no staged image to reconcile")]
    NoStagedImage,

    #[error("staged image {} not found", .path.display())]
    StagedImageMissing { path: PathBuf },

    #[error("refusing to overwrite existing image {}", .path.display())]
    TargetExists { path: PathBuf },

    #[error("failed to move {} to {}: {source}", .from.display(), .to.display())]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image moved to {} but its path was not recorded: {source}", .path.display())]
    ImagePathNotRecorded {
        path: PathBuf,
        #[source]
        source: StoreError,
    },
}
