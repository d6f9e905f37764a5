//! Segmentation model client.
//!
//! The model itself runs elsewhere; this service only relays images to it.
//! It answers either with the annotated image or, when JSON is requested,
//! with the detected water bodies.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use waterseg::{RemoteSegmenter, Segmenter, Settings, UploadedImage};
//!
//! let segmenter = RemoteSegmenter::from_settings(&Settings::from_env()?);
//! let segmented = segmenter.segment(image.clone()).await?;
//! let predictions = segmenter.predict(image).await?;
//! ```

use std::future::Future;

use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::{SegmentError, SegmentResult};
use crate::validation::ImageFormat;

/// An image accepted for segmentation.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

/// Polygon vertex of a detected mask, in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// One detected water body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Box center
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub confidence: f64,
    #[serde(rename = "class")]
    pub class_name: String,
    #[serde(default)]
    pub points: Vec<Point>,
    pub class_id: i64,
    pub detection_id: String,
}

/// JSON answer of the model service.
#[derive(Debug, Deserialize)]
struct ModelPredictions {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

/// Turns an image into its segmented visualization or its detections.
pub trait Segmenter: Send + Sync + 'static {
    /// Annotated image bytes.
    fn segment(&self, image: UploadedImage) -> impl Future<Output = SegmentResult<Vec<u8>>> + Send;

    /// Detected water bodies, possibly none.
    fn predict(&self, image: UploadedImage) -> impl Future<Output = SegmentResult<Vec<Prediction>>> + Send;
}

/// Multipart field the model service reads.
const MODEL_FIELD: &str = "file";

/// Client for a remote segmentation model.
#[derive(Clone)]
pub struct RemoteSegmenter {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl RemoteSegmenter {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            api_key,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.model_api_url.clone(), settings.api_key.clone())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Post the image and return the successful response.
    async fn send(&self, image: UploadedImage, accept: &str) -> SegmentResult<reqwest::Response> {
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(image.format.media_type())?;
        let form = Form::new().part(MODEL_FIELD, part);

        let mut request = self
            .client
            .post(&self.url)
            .header(ACCEPT, accept)
            .multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SegmentError::ModelError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

impl Segmenter for RemoteSegmenter {
    async fn segment(&self, image: UploadedImage) -> SegmentResult<Vec<u8>> {
        let accept = image.format.media_type();
        let response = self.send(image, accept).await?;

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(SegmentError::EmptyResult);
        }

        Ok(bytes.to_vec())
    }

    async fn predict(&self, image: UploadedImage) -> SegmentResult<Vec<Prediction>> {
        let response = self.send(image, "application/json").await?;
        let body: ModelPredictions = response.json().await?;
        Ok(body.predictions)
    }
}
