//! Integration tests for the HTTP surface.
//!
//! The router runs against a scripted transcriber, so no network or API key
//! is needed. Requests go through `tower::ServiceExt::oneshot`; each test
//! clones the router so all requests share one session.

#![cfg(feature = "web")]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use doc2text::web::{build_router, AppState, UPLOAD_FIELD};
use doc2text::{Doc2TextError, PageImage, Pipeline, RasterConfig, Transcriber};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt; // for `oneshot` method

const BOUNDARY: &str = "doc2text-test-boundary";

/// Replies from a fixed list, in order.
struct Scripted(Mutex<Vec<Result<&'static str, &'static str>>>);

impl Scripted {
    fn new(mut replies: Vec<Result<&'static str, &'static str>>) -> Self {
        replies.reverse();
        Self(Mutex::new(replies))
    }
}

#[async_trait]
impl Transcriber for Scripted {
    async fn transcribe(&self, page: &PageImage) -> Result<String, Doc2TextError> {
        match self.0.lock().unwrap().pop() {
            Some(Ok(text)) => Ok(text.to_string()),
            Some(Err(detail)) => Err(Doc2TextError::TranscriptionService {
                page: page.page_num(),
                detail: detail.to_string(),
            }),
            None => Err(Doc2TextError::TranscriptionService {
                page: page.page_num(),
                detail: "no scripted reply".into(),
            }),
        }
    }
}

/// Test helper: router with a scripted transcriber
fn setup_app(replies: Vec<Result<&'static str, &'static str>>) -> Router {
    let pipeline = Pipeline::new(RasterConfig::default(), Arc::new(Scripted::new(replies)));
    build_router(AppState::new(pipeline, 10 * 1024 * 1024))
}

fn png_bytes() -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([255, 255, 255])));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

fn multipart_body(file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{UPLOAD_FIELD}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(file_name: &str, bytes: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(file_name, bytes)))
        .unwrap()
}

fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body")
        .to_vec()
}

async fn page_html(app: &Router) -> String {
    let response = app.clone().oneshot(test_request("GET", "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    String::from_utf8(body_bytes(response.into_body()).await).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app(vec![]);
    let response = app.oneshot(test_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value =
        serde_json::from_slice(&body_bytes(response.into_body()).await).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_fresh_session_shows_upload_control() {
    let app = setup_app(vec![]);
    let html = page_html(&app).await;
    assert!(html.contains("type=\"file\""));
    assert!(!html.contains("<textarea"));
}

#[tokio::test]
async fn test_png_upload_transcript_and_download() {
    let app = setup_app(vec![Ok("Hello world")]);

    let response = app
        .clone()
        .oneshot(upload_request("hello.png", &png_bytes()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let html = page_html(&app).await;
    assert!(html.contains("<textarea readonly"));
    assert!(html.contains("Hello world\n</textarea>"));

    let response = app
        .clone()
        .oneshot(test_request("GET", "/download"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(disposition, "attachment; filename=\"transcricao.txt\"");
    assert_eq!(body_bytes(response.into_body()).await, b"Hello world\n");

    let response = app
        .clone()
        .oneshot(test_request("GET", "/progress"))
        .await
        .unwrap();
    let body: serde_json::Value =
        serde_json::from_slice(&body_bytes(response.into_body()).await).unwrap();
    assert_eq!(body["fraction"], 1.0);
}

#[tokio::test]
async fn test_reset_returns_to_upload() {
    let app = setup_app(vec![Ok("Hello world")]);
    app.clone()
        .oneshot(upload_request("hello.png", &png_bytes()))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(test_request("POST", "/reset"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let html = page_html(&app).await;
    assert!(html.contains("type=\"file\""));
    assert!(!html.contains("<textarea"));

    // Nothing left to download.
    let response = app
        .clone()
        .oneshot(test_request("GET", "/download"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_unsupported_upload_shows_error_once() {
    let app = setup_app(vec![]);
    app.clone()
        .oneshot(upload_request("notes.pdf", b"just text, not a pdf"))
        .await
        .unwrap();

    let html = page_html(&app).await;
    assert!(html.contains("class=\"error\""));
    assert!(html.contains("Unsupported file type"));
    assert!(!html.contains("<textarea"));

    // The message is shown on one render only.
    let html = page_html(&app).await;
    assert!(!html.contains("class=\"error\""));
}

#[tokio::test]
async fn test_service_failure_leaves_no_transcript() {
    let app = setup_app(vec![Err("model overloaded")]);
    app.clone()
        .oneshot(upload_request("page.png", &png_bytes()))
        .await
        .unwrap();

    let html = page_html(&app).await;
    assert!(html.contains("model overloaded"));
    assert!(!html.contains("<textarea"));
}
