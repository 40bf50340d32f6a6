//! Error types for the media studio
//!
//! Validation failures are recovered locally and shown to the user.
//! Transport failures are surfaced without retry. Catalog failures are
//! collapsed into a generic error so backend detail never reaches the caller.
use thiserror::Error;

/// Result type for media studio operations
pub type Result<T> = std::result::Result<T, StudioError>;

/// A file rejected by the size guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("file is {actual} bytes, the limit is {max} bytes")]
pub struct SizeRejected {
    pub actual: u64,
    pub max: u64,
}

/// Why an upload session ended in `Failed`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("file too large: {actual} bytes exceeds the {max} byte limit")]
    TooLarge { actual: u64, max: u64 },

    #[error("no file selected")]
    NoFile,

    #[error("upload failed: {0}")]
    Upload(String),
}

impl UploadError {
    /// True for failures raised before any network call was made
    pub fn is_validation(&self) -> bool {
        matches!(self, UploadError::TooLarge { .. } | UploadError::NoFile)
    }
}

impl From<SizeRejected> for UploadError {
    fn from(rejected: SizeRejected) -> Self {
        UploadError::TooLarge {
            actual: rejected.actual,
            max: rejected.max,
        }
    }
}

/// Export failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("failed to fetch rendered asset: {0}")]
    FetchFailed(String),

    #[error("failed to save exported file: {0}")]
    SaveFailed(String),
}

/// Broad error category, used to pick how a failure is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Transport,
    Catalog,
    Configuration,
}

/// Top-level studio error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StudioError {
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("render failed to load: {0}")]
    RenderFailed(String),

    #[error("nothing to export: no asset has been rendered")]
    NothingToExport,

    #[error("render is still pending")]
    RenderPending,

    #[error("an export is already in progress")]
    ExportInProgress,

    #[error("catalog unavailable")]
    CatalogUnavailable,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl StudioError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StudioError::UnknownPreset(_)
            | StudioError::NothingToExport
            | StudioError::RenderPending
            | StudioError::ExportInProgress => ErrorCategory::Validation,
            StudioError::Upload(err) if err.is_validation() => ErrorCategory::Validation,
            StudioError::Upload(_) | StudioError::Export(_) | StudioError::RenderFailed(_) => {
                ErrorCategory::Transport
            }
            StudioError::CatalogUnavailable => ErrorCategory::Catalog,
            StudioError::Config(_) => ErrorCategory::Configuration,
        }
    }
}
