//! HTTP Server for the segmentation API.
//!
//! Hosts the upload widget and relays uploaded images to the model.
//!
//! # API Endpoints
//!
//! | Method | Path                      | Description                          |
//! |--------|---------------------------|--------------------------------------|
//! | GET    | `/`                       | Service banner (or the widget)       |
//! | GET    | `/health`                 | Health check                         |
//! | POST   | `/api/v1/segment-image`   | Segment one uploaded image           |
//! | POST   | `/api/v1/upload-and-segment` | Detections for several images     |

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use axum::{
    extract::{multipart::Field, DefaultBodyLimit, Multipart, State},
    http::{header, Method},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use uuid::Uuid;

use super::types::{HealthResponse, ImageResult, MultipleImagesResponse, RootResponse};
use crate::config::{Settings, MAX_UPLOAD_SIZE};
use crate::error::{ServerError, ServerResult, UploadError};
use crate::segmenter::{RemoteSegmenter, Segmenter, UploadedImage};
use crate::validation::{validate_name, validate_size};

/// Multipart field holding the image.
pub const UPLOAD_FIELD: &str = "file";

/// Repeated multipart field of the batch endpoint.
pub const BATCH_FIELD: &str = "files";

/// Request body limit: one maximal image plus multipart framing. A batch
/// shares the same limit across all of its files.
const BODY_LIMIT: usize = (MAX_UPLOAD_SIZE as usize) + 1024 * 1024;

/// Shared handler state.
pub struct AppState<S> {
    pub settings: Arc<Settings>,
    pub segmenter: Arc<S>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            settings: Arc::clone(&self.settings),
            segmenter: Arc::clone(&self.segmenter),
        }
    }
}

impl<S: Segmenter> AppState<S> {
    pub fn new(settings: Settings, segmenter: S) -> Self {
        Self {
            settings: Arc::new(settings),
            segmenter: Arc::new(segmenter),
        }
    }
}

/// Build the application router.
///
/// With a `static_dir` the built widget is served for every path the API
/// does not claim, including `/`.
pub fn router<S: Segmenter>(state: AppState<S>, static_dir: Option<PathBuf>) -> Router {
    // CORS permissif pour le développement
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    let api = Router::new()
        .route("/health", get(health::<S>))
        .route("/api/v1/segment-image", post(segment_image::<S>))
        .route("/api/v1/upload-and-segment", post(upload_and_segment::<S>))
        .layer(DefaultBodyLimit::max(BODY_LIMIT));

    let app = match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api.route("/", get(root::<S>)),
    };

    app.layer(cors).with_state(state)
}

/// Start the HTTP server
pub async fn start_server(
    settings: Settings,
    port: u16,
    static_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let segmenter = RemoteSegmenter::from_settings(&settings);
    let model_url = segmenter.url().to_string();
    let name = settings.app_name.clone();
    let serving_widget = static_dir.is_some();
    let app = router(AppState::new(settings, segmenter), static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 {} running on http://localhost:{}", name, port);
    println!("   POST /api/v1/segment-image - Segment one image");
    println!("   POST /api/v1/upload-and-segment - Detections for several images");
    println!("   GET  /health               - Health check");
    if serving_widget {
        println!("   GET  /                     - Upload widget");
    }
    println!();
    println!("🤖 Model service: {}", model_url);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Service banner
async fn root<S: Segmenter>(State(state): State<AppState<S>>) -> Json<RootResponse> {
    Json(RootResponse {
        message: format!("{} is running", state.settings.app_name),
    })
}

/// Health check endpoint
async fn health<S: Segmenter>(State(state): State<AppState<S>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: state.settings.app_name.clone(),
        version: state.settings.app_version.clone(),
    })
}

/// Segment image endpoint
async fn segment_image<S: Segmenter>(
    State(state): State<AppState<S>>,
    multipart: Multipart,
) -> ServerResult<Response> {
    let request_id = Uuid::new_v4();
    let image = read_upload(multipart).await?;
    let file_name = image.file_name.clone();
    let format = image.format;

    println!(
        "📄 [{}] NEW UPLOAD: {} ({} bytes)",
        request_id,
        file_name,
        image.bytes.len()
    );

    let segmented = state.segmenter.segment(image).await.map_err(|e| {
        eprintln!("❌ [{}] Segmentation error: {}", request_id, e);
        ServerError::from(e)
    })?;

    println!("✅ [{}] Segmented {} ({} bytes)", request_id, file_name, segmented.len());

    let disposition = format!(
        "attachment; filename=\"segmented_{}\"",
        header_safe(&file_name)
    );
    Ok((
        [
            (header::CONTENT_TYPE, format.media_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        segmented,
    )
        .into_response())
}

/// Upload several images and get the detected water bodies of each.
///
/// Every file is validated before the first model call; one bad file
/// rejects the whole batch.
async fn upload_and_segment<S: Segmenter>(
    State(state): State<AppState<S>>,
    multipart: Multipart,
) -> ServerResult<Json<MultipleImagesResponse>> {
    let request_id = Uuid::new_v4();
    let images = read_batch(multipart).await?;

    println!("📦 [{}] NEW BATCH: {} image(s)", request_id, images.len());

    let mut results = Vec::with_capacity(images.len());
    for image in images {
        let file_name = image.file_name.clone();
        let predictions = state.segmenter.predict(image).await.map_err(|e| {
            eprintln!("❌ [{}] Segmentation error on {}: {}", request_id, file_name, e);
            ServerError::from(e)
        })?;

        println!("   [{}] {}: {} detection(s)", request_id, file_name, predictions.len());
        results.push(ImageResult {
            image: file_name,
            predictions,
        });
    }

    println!("✅ [{}] Batch done", request_id);
    Ok(Json(MultipleImagesResponse { results }))
}

fn multipart_error(e: impl std::fmt::Display) -> ServerError {
    ServerError::BadRequest(format!("Multipart error: {}", e))
}

/// Read and validate the `file` field of a multipart body.
async fn read_upload(mut multipart: Multipart) -> ServerResult<UploadedImage> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some(UPLOAD_FIELD) {
            return read_image(field).await;
        }
    }

    Err(UploadError::MissingFile.into())
}

/// Read and validate every `files` field of a multipart body.
async fn read_batch(mut multipart: Multipart) -> ServerResult<Vec<UploadedImage>> {
    let mut images = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(BATCH_FIELD) {
            continue;
        }
        images.push(read_image(field).await?);
    }

    if images.is_empty() {
        return Err(UploadError::MissingFile.into());
    }
    Ok(images)
}

async fn read_image(field: Field<'_>) -> ServerResult<UploadedImage> {
    let file_name = field.file_name().map(|s| s.to_string());
    let format = validate_name(file_name.as_deref())?;
    let bytes = field
        .bytes()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
    validate_size(bytes.len() as u64)?;

    Ok(UploadedImage {
        file_name: file_name.unwrap_or_default(),
        format,
        bytes: bytes.to_vec(),
    })
}

/// Replace characters that cannot appear in a quoted header parameter.
fn header_safe(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_safe() {
        assert_eq!(header_safe("lake.png"), "lake.png");
        assert_eq!(header_safe("my lake.png"), "my lake.png");
        assert_eq!(header_safe("la\"ke.png"), "la_ke.png");
        assert_eq!(header_safe("lac_été.png"), "lac__t_.png");
    }
}
