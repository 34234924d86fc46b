//! HTTP surface for the transcription UI.
//!
//! A single page drives the whole interaction. The process serves one
//! session: the [`SessionState`] lives behind one mutex, so interactions are
//! applied one at a time, in arrival order. Progress lives in a separate
//! lock-free [`ProgressCell`] so `/progress` answers while an upload holds
//! the session.
//!
//! | Route       | Method | Purpose                                   |
//! |-------------|--------|-------------------------------------------|
//! | `/`         | GET    | upload control or transcript              |
//! | `/upload`   | POST   | multipart upload, runs the pipeline       |
//! | `/download` | GET    | `transcricao.txt` attachment              |
//! | `/reset`    | POST   | start over                                |
//! | `/progress` | GET    | `{"fraction": 0.0..1.0}`                  |
//! | `/health`   | GET    | liveness                                  |

use crate::convert::Pipeline;
use crate::document::UploadedFile;
use crate::progress::ProgressCell;
use crate::session::{Presenter, SessionState, UiEvent, View};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Multipart field carrying the document.
pub const UPLOAD_FIELD: &str = "file";

/// Extensions offered by the file picker. Content is re-checked server-side.
const ACCEPTED_EXTENSIONS: &str = ".pdf,.png,.jpg,.jpeg";

/// Session plus the message of the last failed run, shown once.
#[derive(Debug, Default)]
struct UiSession {
    state: SessionState,
    flash: Option<String>,
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    presenter: Arc<Presenter>,
    session: Arc<Mutex<UiSession>>,
    progress: Arc<ProgressCell>,
    max_upload_bytes: usize,
}

impl AppState {
    pub fn new(pipeline: Pipeline, max_upload_bytes: usize) -> Self {
        Self {
            presenter: Arc::new(Presenter::new(pipeline)),
            session: Arc::new(Mutex::new(UiSession::default())),
            progress: Arc::new(ProgressCell::new()),
            max_upload_bytes,
        }
    }

    /// Apply one event to the session and return the resulting view.
    async fn interact(&self, event: UiEvent) -> View {
        let mut session = self.session.lock().await;
        let current = std::mem::take(&mut session.state);
        let step = self
            .presenter
            .interact(current, event, self.progress.as_ref())
            .await;
        session.state = step.state;
        step.view
    }
}

/// Build application router.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;
    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload))
        .route("/download", get(download))
        .route("/reset", post(reset))
        .route("/progress", get(progress))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// GET /
async fn index(State(state): State<AppState>) -> Response {
    let view = state.interact(UiEvent::Render).await;
    let flash = state.session.lock().await.flash.take();
    match view {
        View::Upload { error } => Html(render_page(&View::Upload { error: error.or(flash) }))
            .into_response(),
        other => Html(render_page(&other)).into_response(),
    }
}

/// POST /upload
async fn upload(State(state): State<AppState>, multipart: Multipart) -> Response {
    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(message) => {
            warn!("Rejected upload: {}", message);
            state.session.lock().await.flash = Some(message);
            return Redirect::to("/").into_response();
        }
    };

    state.progress.reset();
    if let View::Upload { error: Some(message) } = state.interact(UiEvent::Upload(upload)).await {
        state.session.lock().await.flash = Some(message);
    }
    Redirect::to("/").into_response()
}

/// Pull the first file field out of the multipart body.
async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, String> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Error processing the file: {}", e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| format!("Error processing the file: {}", e.body_text()))?;
        if bytes.is_empty() {
            return Err("Please choose a PDF or image file to upload.".to_string());
        }
        debug!("Received upload '{}' ({} bytes)", file_name, bytes.len());
        return Ok(UploadedFile::new(file_name, bytes.to_vec()));
    }
    Err("Please choose a PDF or image file to upload.".to_string())
}

/// GET /download
async fn download(State(state): State<AppState>) -> Response {
    match state.interact(UiEvent::Download).await {
        View::Download(file) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file.file_name),
                ),
            ],
            file.content,
        )
            .into_response(),
        _ => Redirect::to("/").into_response(),
    }
}

/// POST /reset
async fn reset(State(state): State<AppState>) -> Redirect {
    state.interact(UiEvent::StartOver).await;
    state.progress.reset();
    Redirect::to("/")
}

#[derive(Debug, Serialize)]
struct ProgressBody {
    fraction: f32,
}

/// GET /progress
async fn progress(State(state): State<AppState>) -> Json<ProgressBody> {
    Json(ProgressBody {
        fraction: state.progress.get(),
    })
}

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ── HTML ─────────────────────────────────────────────────────────────────────

const PROGRESS_SCRIPT: &str = r#"<script>
document.getElementById('upload-form').addEventListener('submit', function () {
  var bar = document.getElementById('progress');
  bar.hidden = false;
  document.getElementById('submit').disabled = true;
  setInterval(function () {
    fetch('/progress').then(function (r) { return r.json(); })
      .then(function (p) { bar.value = p.fraction; })
      .catch(function () {});
  }, 500);
});
</script>"#;

/// Render the page for a view.
fn render_page(view: &View) -> String {
    let body = match view {
        View::Upload { error } => upload_body(error.as_deref()),
        View::Transcript { text } => transcript_body(text),
        // `/download` answers with the file itself; a page render shows the
        // same transcript the attachment carries.
        View::Download(file) => transcript_body(&String::from_utf8_lossy(&file.content)),
    };

    format!(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
<title>PDF/Image to Text</title>\n\
<style>body{{font-family:sans-serif;max-width:60rem;margin:2rem auto}}.error{{color:#b00}}textarea{{width:100%}}</style>\n\
</head>\n<body>\n<h1>PDF/Image to Text</h1>\n{body}</body>\n</html>\n"
    )
}

fn upload_body(error: Option<&str>) -> String {
    let error_html = error
        .map(|e| format!("<p class=\"error\">{}</p>\n", encode_text(e)))
        .unwrap_or_default();
    format!(
        "{error_html}<form id=\"upload-form\" method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">\n\
<label>Upload a PDF or image <input type=\"file\" name=\"{}\" accept=\"{}\" required></label>\n\
<button id=\"submit\" type=\"submit\">Transcribe</button>\n\
</form>\n\
<progress id=\"progress\" max=\"1\" value=\"0\" hidden></progress>\n\
{PROGRESS_SCRIPT}\n",
        encode_double_quoted_attribute(UPLOAD_FIELD),
        encode_double_quoted_attribute(ACCEPTED_EXTENSIONS),
    )
}

/// The parser drops one newline right after `<textarea>`, so one is always
/// emitted there and a transcript's own leading newline survives.
fn transcript_body(text: &str) -> String {
    format!(
        "<h2>Transcribed text</h2>\n\
<textarea readonly rows=\"24\" cols=\"100\">\n{}</textarea>\n\
<p><a href=\"/download\" download>Download transcript</a></p>\n\
<form method=\"post\" action=\"/reset\"><button type=\"submit\">New transcription</button></form>\n",
        encode_text(text)
    )
}
