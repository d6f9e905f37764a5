//! REST API types.
//!
//! Error bodies follow the `{"detail": "..."}` shape the upload widget
//! reads.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use crate::error::ServerError;
use crate::segmenter::Prediction;

/// Response of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Detections for one uploaded image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResult {
    /// Uploaded file name
    pub image: String,
    pub predictions: Vec<Prediction>,
}

/// Response of `POST /api/v1/upload-and-segment`, in upload order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultipleImagesResponse {
    pub results: Vec<ImageResult>,
}

/// Error body sent to the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Create an error response body.
pub fn error_response(detail: impl Into<String>) -> ErrorBody {
    ErrorBody {
        detail: detail.into(),
    }
}

impl ServerError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Upload(_) | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Segment(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        eprintln!("❌ {}", self);
        (self.status_code(), Json(error_response(self.to_string()))).into_response()
    }
}
