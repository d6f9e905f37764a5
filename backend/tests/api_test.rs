//! HTTP API tests against a live router with in-process segmenters.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value;
use tokio::net::TcpListener;
use waterseg::error::SegmentResult;
use waterseg::{
    router, AppState, MultipleImagesResponse, Point, Prediction, SegmentError, Segmenter, Settings,
    UploadedImage,
};

/// Prefixes the uploaded bytes so tests can check what reached the model,
/// and reports one detection per image.
#[derive(Clone, Default)]
struct EchoSegmenter {
    calls: Arc<AtomicUsize>,
}

impl EchoSegmenter {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Segmenter for EchoSegmenter {
    async fn segment(&self, image: UploadedImage) -> SegmentResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut out = format!("segmented:{}:", image.file_name).into_bytes();
        out.extend(image.bytes);
        Ok(out)
    }

    async fn predict(&self, image: UploadedImage) -> SegmentResult<Vec<Prediction>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![Prediction {
            x: 10.0,
            y: 20.0,
            width: 4.0,
            height: 2.0,
            confidence: 0.9,
            class_name: "water".to_string(),
            points: vec![Point { x: 8.0, y: 19.0 }, Point { x: 12.0, y: 21.0 }],
            class_id: 0,
            detection_id: format!("det-{}", image.file_name),
        }])
    }
}

struct OfflineSegmenter;

impl Segmenter for OfflineSegmenter {
    async fn segment(&self, _image: UploadedImage) -> SegmentResult<Vec<u8>> {
        Err(SegmentError::ModelError {
            status: 503,
            message: "model offline".to_string(),
        })
    }

    async fn predict(&self, _image: UploadedImage) -> SegmentResult<Vec<Prediction>> {
        Err(SegmentError::ModelError {
            status: 503,
            message: "model offline".to_string(),
        })
    }
}

fn settings() -> Settings {
    Settings {
        app_name: "Water Segmentation API".to_string(),
        app_version: "9.9.9".to_string(),
        model_api_url: "http://model.invalid/segment".to_string(),
        api_key: None,
    }
}

async fn spawn<S: Segmenter>(segmenter: S, static_dir: Option<PathBuf>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(AppState::new(settings(), segmenter), static_dir);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn image_form(field: &str, file_name: &str, bytes: &[u8]) -> Form {
    Form::new().part(field.to_string(), Part::bytes(bytes.to_vec()).file_name(file_name.to_string()))
}

fn batch_form(files: &[(&str, &str)]) -> Form {
    files.iter().fold(Form::new(), |form, (name, content)| {
        form.part("files", Part::bytes(content.as_bytes().to_vec()).file_name(name.to_string()))
    })
}

async fn post_to(base: &str, path: &str, form: Form) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}{}", base, path))
        .multipart(form)
        .send()
        .await
        .unwrap()
}

async fn post_image(base: &str, form: Form) -> reqwest::Response {
    post_to(base, "/api/v1/segment-image", form).await
}

async fn post_batch(base: &str, form: Form) -> reqwest::Response {
    post_to(base, "/api/v1/upload-and-segment", form).await
}

async fn detail(response: reqwest::Response) -> String {
    let body: Value = response.json().await.unwrap();
    body["detail"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_root_banner() {
    let base = spawn(EchoSegmenter::default(), None).await;

    let body: Value = reqwest::get(format!("{}/", base)).await.unwrap().json().await.unwrap();

    assert_eq!(body["message"], "Water Segmentation API is running");
}

#[tokio::test]
async fn test_health() {
    let base = spawn(EchoSegmenter::default(), None).await;

    let body: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], "9.9.9");
}

#[tokio::test]
async fn test_segment_returns_image() {
    let base = spawn(EchoSegmenter::default(), None).await;

    let response = post_image(&base, image_form("file", "lake.png", b"pngdata")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers().clone();
    assert_eq!(headers["content-type"], "image/png");
    assert!(headers["content-disposition"]
        .to_str()
        .unwrap()
        .contains("segmented_lake.png"));

    let body = response.bytes().await.unwrap();
    assert_eq!(&body[..], b"segmented:lake.png:pngdata");
}

#[tokio::test]
async fn test_jpg_served_as_jpeg() {
    let base = spawn(EchoSegmenter::default(), None).await;

    let response = post_image(&base, image_form("file", "river.JPG", b"jpgdata")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/jpeg");
}

#[tokio::test]
async fn test_rejects_unsupported_type() {
    let base = spawn(EchoSegmenter::default(), None).await;

    let response = post_image(&base, image_form("file", "map.gif", b"gif89a")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(detail(response).await.contains("File type not allowed"));
}

#[tokio::test]
async fn test_rejects_missing_file_field() {
    let base = spawn(EchoSegmenter::default(), None).await;

    let response = post_image(&base, image_form("image", "lake.png", b"pngdata")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(detail(response).await, "No file provided");
}

#[tokio::test]
async fn test_rejects_empty_file() {
    let base = spawn(EchoSegmenter::default(), None).await;

    let response = post_image(&base, image_form("file", "lake.png", b"")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(detail(response).await, "File is empty");
}

#[tokio::test]
async fn test_model_failure_is_reported() {
    let base = spawn(OfflineSegmenter, None).await;

    let response = post_image(&base, image_form("file", "lake.png", b"pngdata")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let detail = detail(response).await;
    assert!(detail.starts_with("Segmentation failed:"));
    assert!(detail.contains("model offline"));
}

#[tokio::test]
async fn test_serves_widget_from_static_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>widget</html>").unwrap();
    let base = spawn(EchoSegmenter::default(), Some(dir.path().to_path_buf())).await;

    let body = reqwest::get(format!("{}/", base)).await.unwrap().text().await.unwrap();
    assert_eq!(body, "<html>widget</html>");

    // API routes still win over the static fallback
    let response = post_image(&base, image_form("file", "lake.png", b"pngdata")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_batch_returns_predictions_in_order() {
    let segmenter = EchoSegmenter::default();
    let base = spawn(segmenter.clone(), None).await;

    let response = post_batch(
        &base,
        batch_form(&[("lake.png", "one"), ("river.jpeg", "two")]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let raw: Value = response.json().await.unwrap();
    assert_eq!(raw["results"][0]["predictions"][0]["class"], "water");

    let body: MultipleImagesResponse = serde_json::from_value(raw).unwrap();
    let images: Vec<&str> = body.results.iter().map(|r| r.image.as_str()).collect();
    assert_eq!(images, vec!["lake.png", "river.jpeg"]);
    assert_eq!(body.results[1].predictions[0].detection_id, "det-river.jpeg");
    assert_eq!(body.results[0].predictions[0].points.len(), 2);
    assert_eq!(segmenter.calls(), 2);
}

#[tokio::test]
async fn test_batch_with_one_bad_file_is_rejected() {
    let segmenter = EchoSegmenter::default();
    let base = spawn(segmenter.clone(), None).await;

    let response = post_batch(
        &base,
        batch_form(&[("lake.png", "one"), ("map.gif", "gif89a")]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(detail(response).await.contains("File type not allowed"));
    assert_eq!(segmenter.calls(), 0);
}

#[tokio::test]
async fn test_batch_without_files_is_rejected() {
    let base = spawn(EchoSegmenter::default(), None).await;

    let response = post_batch(&base, image_form("file", "lake.png", b"one")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(detail(response).await, "No file provided");
}

#[tokio::test]
async fn test_batch_model_failure_is_reported() {
    let base = spawn(OfflineSegmenter, None).await;

    let response = post_batch(&base, batch_form(&[("lake.png", "one")])).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(detail(response).await.starts_with("Segmentation failed:"));
}
