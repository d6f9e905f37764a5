//! Application configuration.
//!
//! Centralized configuration for the segmentation upload widget.
//! The widget is served by the same origin as the API, so the endpoint
//! is a relative path.

use crate::types::FailurePolicy;

/// Application name, shown in the page title.
pub const APP_NAME: &str = "Water Segmentation";

/// Segmentation endpoint.
///
/// Receives one multipart `file` field per request and answers with the
/// segmented image.
pub const SEGMENT_ENDPOINT: &str = "/api/v1/segment-image";

/// Multipart field name holding the uploaded image.
pub const UPLOAD_FIELD: &str = "file";

/// MIME types accepted by the picker and the drop zone.
pub const ACCEPTED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/tiff"];

/// Maximum file size for upload (in bytes).
///
/// 500 MiB limit.
pub const MAX_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Delay before a success notice hides itself.
pub const NOTICE_AUTO_HIDE_MS: u32 = 5_000;

/// Delay before scrolling, so the DOM has rendered the target.
pub const SCROLL_DELAY_MS: u32 = 100;

/// What a failed file does to the rest of the batch.
///
/// `AbortBatch` stops at the first failure; `ContinueOnError` attempts
/// every file and shows failure cards next to the results.
pub const FAILURE_POLICY: FailurePolicy = FailurePolicy::AbortBatch;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_policy_defaults_to_abort() {
        assert_eq!(FAILURE_POLICY, FailurePolicy::default());
    }
}
