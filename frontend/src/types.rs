//! Common types used across the frontend application.
//!
//! This module centralizes type definitions shared by the orchestrator,
//! the segmentation client and the Leptos view.
//!
//! # Categories
//!
//! - **File Types** - Upload candidates and their display summaries
//! - **Outcome Types** - Per-file submission results
//! - **Session Types** - Orchestrator state and policy
//! - **Error Types** - Frontend error handling

use std::fmt;
use thiserror::Error;

// =============================================================================
// File Types
// =============================================================================

/// A file handle the orchestrator can validate and submit.
///
/// Implemented for `web_sys::File` in the browser; tests use plain structs.
pub trait UploadFile: Clone + 'static {
    /// File name as reported by the picker.
    fn name(&self) -> String;
    /// Declared MIME type (may be empty when the browser cannot tell).
    fn mime_type(&self) -> String;
    /// Size in bytes.
    fn size(&self) -> u64;
}

impl UploadFile for web_sys::File {
    fn name(&self) -> String {
        web_sys::File::name(self)
    }

    fn mime_type(&self) -> String {
        web_sys::Blob::type_(self)
    }

    fn size(&self) -> u64 {
        web_sys::Blob::size(self) as u64
    }
}

/// Display summary of a selected file.
#[derive(Clone, Debug, PartialEq)]
pub struct FileSummary {
    /// File name
    pub name: String,
    /// Declared MIME type
    pub mime_type: String,
    /// Size in bytes
    pub size: u64,
    /// Object URL for the thumbnail, when one could be created
    pub preview_url: Option<String>,
}

impl FileSummary {
    /// Human readable size, e.g. `2.00 MB`.
    pub fn formatted_size(&self) -> String {
        format_size(self.size)
    }
}

/// Segmented image payload returned by the server.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentedImage {
    /// Raw image bytes
    pub bytes: Vec<u8>,
    /// Content type from the response headers
    pub content_type: String,
}

// =============================================================================
// Outcome Types
// =============================================================================

/// Result of submitting one file.
#[derive(Clone, Debug, PartialEq)]
pub enum ProcessingOutcome {
    /// The server returned a segmented image.
    Success {
        file_name: String,
        /// Handle of the uploaded original
        original_url: Option<String>,
        /// Handle of the segmented image
        segmented_url: String,
    },
    /// The request failed.
    Failure { file_name: String, message: String },
}

impl ProcessingOutcome {
    pub fn file_name(&self) -> &str {
        match self {
            ProcessingOutcome::Success { file_name, .. } => file_name,
            ProcessingOutcome::Failure { file_name, .. } => file_name,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProcessingOutcome::Success { .. })
    }

    /// Stable key for list rendering.
    pub fn render_key(&self) -> String {
        match self {
            ProcessingOutcome::Success { segmented_url, .. } => segmented_url.clone(),
            ProcessingOutcome::Failure { file_name, message } => {
                format!("failed:{}:{}", file_name, message)
            }
        }
    }
}

/// Summary of one `submit` run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubmitReport {
    /// Outcomes in submission order
    pub outcomes: Vec<ProcessingOutcome>,
    /// Files never sent because the batch was aborted
    pub skipped: usize,
}

impl SubmitReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Every file of the selection was segmented.
    pub fn is_complete(&self) -> bool {
        self.skipped == 0 && self.failed() == 0
    }
}

/// Outcome of a `select` call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionReport {
    /// Number of candidates that entered the selection
    pub accepted: usize,
    /// Candidates turned away, in input order
    pub rejected: Vec<Rejection>,
}

// =============================================================================
// Session Types
// =============================================================================

/// Orchestrator session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing selected
    Idle,
    /// A non-empty selection awaits submission
    Selected,
    /// Requests are in flight
    Submitting,
    /// Last submission segmented every file
    Completed,
    /// Last submission hit at least one failure
    Failed,
}

/// What happens to the rest of a batch when one file fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failure; partial successes are not rendered.
    #[default]
    AbortBatch,
    /// Attempt every file and render failures next to successes.
    ContinueOnError,
}

/// Scroll destinations the orchestrator can ask the view for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollTarget {
    /// Back to the drop zone (initial position)
    UploadZone,
    /// The selected files list
    Selection,
    /// The results gallery
    Results,
}

// =============================================================================
// Error Types
// =============================================================================

/// Why a candidate file was turned away.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// MIME type outside the accepted list
    InvalidType { mime_type: String },
    /// Larger than [`crate::MAX_FILE_SIZE`]
    TooLarge { size: u64 },
}

/// A candidate that failed client-side validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
    pub file_name: String,
    pub reason: RejectReason,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            RejectReason::InvalidType { mime_type } => {
                let declared = if mime_type.is_empty() { "unknown" } else { mime_type };
                write!(
                    f,
                    "Invalid file type for \"{}\" ({}). Please upload JPG, PNG, or TIFF images.",
                    self.file_name, declared
                )
            }
            RejectReason::TooLarge { size } => write!(
                f,
                "File \"{}\" is too large ({}). Maximum size is 500MB.",
                self.file_name,
                format_size(*size)
            ),
        }
    }
}

/// Frontend upload errors.
///
/// Every variant is surfaced through the notice channel.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum UploadError {
    /// Candidate rejected before any network call.
    #[error("{0}")]
    Validation(Rejection),

    /// Submit pressed with nothing selected.
    #[error("Please select at least one image first.")]
    EmptySelection,

    /// Submit pressed while a batch is running.
    #[error("A submission is already in progress.")]
    Busy,

    /// Server answered with a non-success status.
    #[error("{}", remote_message(.file_name, .detail))]
    Remote {
        file_name: String,
        status: u16,
        detail: Option<String>,
    },

    /// Network or decoding failure.
    #[error("{message}")]
    Transport { file_name: String, message: String },
}

fn remote_message(file_name: &str, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => detail.clone(),
        None => format!("Segmentation failed for \"{}\"", file_name),
    }
}

/// Result type alias for frontend operations.
pub type UploadResult<T> = Result<T, UploadError>;

/// Format a byte count with binary units.
pub fn format_size(size: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = size as f64;
    let mut unit = 0;

    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", size, UNITS[unit])
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2 * 1024 * 1024), "2.00 MB");
        assert_eq!(format_size(600 * 1024 * 1024), "600.00 MB");
    }

    #[test]
    fn test_remote_error_prefers_server_detail() {
        let err = UploadError::Remote {
            file_name: "lake.png".into(),
            status: 400,
            detail: Some("File type not allowed".into()),
        };
        assert_eq!(err.to_string(), "File type not allowed");

        let err = UploadError::Remote {
            file_name: "lake.png".into(),
            status: 500,
            detail: None,
        };
        assert_eq!(err.to_string(), "Segmentation failed for \"lake.png\"");
    }

    #[test]
    fn test_rejection_messages_name_the_file() {
        let invalid = Rejection {
            file_name: "map.gif".into(),
            reason: RejectReason::InvalidType { mime_type: "image/gif".into() },
        };
        let msg = invalid.to_string();
        assert!(msg.contains("map.gif"));
        assert!(msg.contains("Invalid file type"));

        let large = Rejection {
            file_name: "huge.tiff".into(),
            reason: RejectReason::TooLarge { size: 600 * 1024 * 1024 },
        };
        let msg = large.to_string();
        assert!(msg.contains("huge.tiff"));
        assert!(msg.contains("too large"));
    }

    #[test]
    fn test_report_counts() {
        let report = SubmitReport {
            outcomes: vec![
                ProcessingOutcome::Success {
                    file_name: "a.png".into(),
                    original_url: None,
                    segmented_url: "blob:a".into(),
                },
                ProcessingOutcome::Failure {
                    file_name: "b.png".into(),
                    message: "boom".into(),
                },
            ],
            skipped: 1,
        };
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_complete());
    }
}
