//! # Waterseg - Water body segmentation service
//!
//! Hosts the upload widget and relays each uploaded image to an external
//! segmentation model, returning the segmented visualization.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Widget    │────▶│  Validate   │────▶│  Segmenter  │────▶│  Segmented  │
//! │ (multipart) │     │ (type/size) │     │ (model API) │     │    image    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use waterseg::{start_server, Settings};
//!
//! #[tokio::main]
//! async fn main() {
//!     let settings = Settings::from_env().unwrap();
//!     start_server(settings, 8000, None).await.unwrap();
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Environment settings
//! - [`validation`] - Upload type and size checks
//! - [`segmenter`] - Model service client
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod config;

// Validation
pub mod validation;

// Model
pub mod segmenter;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, SegmentError, ServerError, UploadError};
pub use config::{Settings, DEFAULT_PORT, MAX_UPLOAD_SIZE};
pub use validation::{validate_upload, ImageFormat};
pub use segmenter::{Point, Prediction, RemoteSegmenter, Segmenter, UploadedImage};
pub use api::{router, start_server, AppState, ImageResult, MultipleImagesResponse};
