//! HTTP service posting images to the segmentation endpoint.

use std::future::Future;

use gloo_net::http::Request;
use serde::Deserialize;
use serde_json::Value;
use web_sys::{File, FormData};

use crate::types::{SegmentedImage, UploadError, UploadFile, UploadResult};
use crate::UPLOAD_FIELD;

/// Sends one file to the segmentation service.
///
/// The orchestrator awaits each call before issuing the next.
pub trait SegmentClient<F> {
    fn segment(&self, file: &F) -> impl Future<Output = UploadResult<SegmentedImage>>;
}

/// Error body returned by the server on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Value,
}

/// Extract the human readable `detail` from an error body.
///
/// Validation errors may carry `detail` as a list of objects with a `msg`
/// field; the first message is used then.
pub fn parse_error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        Value::String(detail) if !detail.trim().is_empty() => Some(detail),
        Value::Array(items) => items
            .iter()
            .find_map(|item| item.get("msg")?.as_str().map(str::to_string)),
        _ => None,
    }
}

/// Client for `POST /api/v1/segment-image` built on `gloo-net`.
#[derive(Clone, Debug)]
pub struct HttpSegmentClient {
    endpoint: String,
}

impl HttpSegmentClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post_file(&self, file: &File) -> UploadResult<SegmentedImage> {
        let file_name = UploadFile::name(file);
        let transport = |message: String| UploadError::Transport {
            file_name: file_name.clone(),
            message,
        };

        let form_data =
            FormData::new().map_err(|e| transport(format!("Failed to create FormData: {:?}", e)))?;
        form_data
            .append_with_blob_and_filename(UPLOAD_FIELD, file, &file_name)
            .map_err(|e| transport(format!("Failed to append file: {:?}", e)))?;

        let request = Request::post(&self.endpoint)
            .body(form_data)
            .map_err(|e| transport(format!("Failed to build request: {}", e)))?;

        let response = request
            .send()
            .await
            .map_err(|e| transport(format!("HTTP request failed: {}", e)))?;

        if !response.ok() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Remote {
                file_name,
                status: response.status(),
                detail: parse_error_detail(&body),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .unwrap_or_else(|| "image/png".to_string());
        let bytes = response
            .binary()
            .await
            .map_err(|e| transport(format!("Failed to read image: {}", e)))?;

        Ok(SegmentedImage {
            bytes,
            content_type,
        })
    }
}

impl SegmentClient<File> for HttpSegmentClient {
    async fn segment(&self, file: &File) -> UploadResult<SegmentedImage> {
        self.post_file(file).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_string() {
        let body = r#"{"detail": "Segmentation failed: model unavailable"}"#;
        assert_eq!(
            parse_error_detail(body).as_deref(),
            Some("Segmentation failed: model unavailable")
        );
    }

    #[test]
    fn test_detail_list() {
        let body = r#"{"detail": [{"loc": ["body", "file"], "msg": "field required", "type": "missing"}]}"#;
        assert_eq!(parse_error_detail(body).as_deref(), Some("field required"));
    }

    #[test]
    fn test_missing_or_unparseable_detail() {
        assert_eq!(parse_error_detail(r#"{"error": "nope"}"#), None);
        assert_eq!(parse_error_detail(r#"{"detail": ""}"#), None);
        assert_eq!(parse_error_detail("<html>502 Bad Gateway</html>"), None);
        assert_eq!(parse_error_detail(""), None);
    }

    #[test]
    fn test_endpoint() {
        let client = HttpSegmentClient::new(crate::SEGMENT_ENDPOINT);
        assert_eq!(client.endpoint(), "/api/v1/segment-image");
    }
}
