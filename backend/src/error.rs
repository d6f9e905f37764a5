//! Error types for the segmentation service.
//!
//! - [`ConfigError`] - Missing or invalid settings
//! - [`UploadError`] - Rejected uploads (type, size, missing field)
//! - [`SegmentError`] - Model service failures
//! - [`ServerError`] - Top-level HTTP errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable not set.
    #[error("Missing {0} environment variable")]
    Missing(&'static str),

    /// Variable set but unusable.
    #[error("Invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

// =============================================================================
// Upload Errors
// =============================================================================

/// Upload rejected before reaching the model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    /// Multipart body without a `file` field.
    #[error("No file provided")]
    MissingFile,

    /// File without a name.
    #[error("File name is missing")]
    MissingName,

    /// Extension outside the accepted list.
    #[error("File type not allowed: {0}. Allowed types: jpg, jpeg, png, tiff")]
    TypeNotAllowed(String),

    /// Larger than the configured maximum.
    #[error("File size exceeds the maximum allowed size of {max_mb}MB")]
    TooLarge { size: u64, max_mb: u64 },

    /// Zero-byte upload.
    #[error("File is empty")]
    Empty,
}

// =============================================================================
// Segmentation Errors
// =============================================================================

/// Errors from the model service.
#[derive(Debug, Error)]
pub enum SegmentError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    /// Model service answered with an error status.
    #[error("Model service error ({status}): {message}")]
    ModelError { status: u16, message: String },

    /// Model service answered without an image.
    #[error("No segmentation results obtained")]
    EmptyResult,
}

impl From<reqwest::Error> for SegmentError {
    fn from(e: reqwest::Error) -> Self {
        SegmentError::RequestFailed(e.to_string())
    }
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Upload rejected.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Segmentation failed.
    #[error("Segmentation failed: {0}")]
    Segment(#[from] SegmentError),

    /// Malformed request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for settings.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for model calls.
pub type SegmentResult<T> = Result<T, SegmentError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
