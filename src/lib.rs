//! # doc2text
//!
//! Transcribe PDF and image uploads to plain text with a Vision Language
//! Model.
//!
//! Each page is rasterised and sent to a multimodal model together with a
//! fixed instruction asking for a literal transcription. The per-page texts
//! are joined in page order, one `"\n"` after each page.
//!
//! ## Pipeline Overview
//!
//! ```text
//! upload bytes
//!  │
//!  ├─ 1. Validate  sniff content: PDF, PNG or JPEG only
//!  ├─ 2. Render    rasterise pages via pdfium / decode the image
//!  ├─ 3. Encode    PNG → base64 ImageData
//!  ├─ 4. VLM       one sequential call per page, first failure aborts
//!  └─ 5. Present   transcript view, transcricao.txt download, start over
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doc2text::{NoopProgressCallback, Pipeline, TranscriptionConfig, UploadedFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TranscriptionConfig::default();
//!     config.transcriber.require_api_key()?;
//!     let pipeline = Pipeline::from_config(&config)?;
//!
//!     let upload = UploadedFile::from_path("scan.pdf").await?;
//!     let transcript = pipeline.run(&upload, &NoopProgressCallback).await?;
//!     print!("{transcript}");
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `web`   | on      | The `doc2text` server binary and the [`web`] module (axum + clap + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod session;
#[cfg(feature = "web")]
pub mod web;

#[cfg(test)]
mod testing;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{RasterConfig, TranscriberConfig, TranscriptionConfig, TranscriptionConfigBuilder};
pub use convert::{transcribe_file, Pipeline};
pub use document::{DocumentKind, PageImage, Transcription, UploadedFile, ValidatedDocument};
pub use error::Doc2TextError;
pub use pipeline::llm::{Transcriber, VlmTranscriber};
pub use progress::{
    ConversionProgressCallback, NoopProgressCallback, Progress, ProgressCallback, ProgressCell,
};
pub use session::{Download, Presenter, SessionState, Step, UiEvent, View, DOWNLOAD_FILE_NAME};
