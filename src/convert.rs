//! The transcription pipeline: validate → rasterise → transcribe each page.
//!
//! Pages are transcribed strictly in order, one request at a time. The
//! first failure anywhere ends the run and is returned as-is; no partial
//! transcript ever leaves [`Pipeline::run`].

use crate::config::{RasterConfig, TranscriptionConfig};
use crate::document::{PageImage, Transcription, UploadedFile};
use crate::error::Doc2TextError;
use crate::pipeline::llm::{Transcriber, VlmTranscriber};
use crate::pipeline::{render, validate};
use crate::progress::{ConversionProgressCallback, Progress};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// A configured pipeline: rasteriser settings plus a transcription client.
#[derive(Clone)]
pub struct Pipeline {
    raster: RasterConfig,
    transcriber: Arc<dyn Transcriber>,
}

impl Pipeline {
    pub fn new(raster: RasterConfig, transcriber: Arc<dyn Transcriber>) -> Self {
        Self {
            raster,
            transcriber,
        }
    }

    /// Build a pipeline whose client is the provider named in `config`.
    pub fn from_config(config: &TranscriptionConfig) -> Result<Self, Doc2TextError> {
        let transcriber = VlmTranscriber::from_config(&config.transcriber)?;
        Ok(Self::new(config.raster, Arc::new(transcriber)))
    }

    /// Rendering settings applied to every upload.
    pub fn raster_config(&self) -> &RasterConfig {
        &self.raster
    }

    /// Transcribe one upload.
    ///
    /// # Errors
    /// - `UnsupportedType` — content is not PDF, PNG or JPEG
    /// - `Decode` / `EmptyDocument` — the document yields no usable pages
    /// - `TranscriptionService` — the first page whose remote call failed
    pub async fn run(
        &self,
        upload: &UploadedFile,
        progress: &dyn ConversionProgressCallback,
    ) -> Result<Transcription, Doc2TextError> {
        let result = self.run_inner(upload, progress).await;
        if let Err(ref e) = result {
            warn!(code = e.code(), "Transcription of '{}' failed: {}", upload.file_name, e);
        }
        result
    }

    async fn run_inner(
        &self,
        upload: &UploadedFile,
        progress: &dyn ConversionProgressCallback,
    ) -> Result<Transcription, Doc2TextError> {
        let total_start = Instant::now();
        info!(
            "Starting transcription: '{}' ({} bytes)",
            upload.file_name,
            upload.bytes.len()
        );

        // ── Step 1: Validate ─────────────────────────────────────────────────
        let doc = validate::validate_upload(upload.clone())?;
        debug!("Validated as {}", doc.kind());

        // ── Step 2: Rasterise ────────────────────────────────────────────────
        let render_start = Instant::now();
        let pages = render::render_document(&doc, &self.raster).await?;
        info!(
            "Rasterised {} pages in {}ms",
            pages.len(),
            render_start.elapsed().as_millis()
        );

        // ── Step 3: Transcribe page by page ──────────────────────────────────
        let transcription = self.transcribe_pages(&pages, progress).await?;

        info!(
            "Transcription complete: {} pages, {} chars, {}ms total",
            transcription.page_count(),
            transcription.as_str().len(),
            total_start.elapsed().as_millis()
        );
        Ok(transcription)
    }

    /// Transcribe already rasterised pages, in slice order.
    ///
    /// Stops at the first failing page and returns its error.
    pub async fn transcribe_pages(
        &self,
        pages: &[PageImage],
        progress: &dyn ConversionProgressCallback,
    ) -> Result<Transcription, Doc2TextError> {
        let total_pages = pages.len();
        progress.on_conversion_start(total_pages);

        let mut transcription = Transcription::default();
        for (i, page) in pages.iter().enumerate() {
            let page_num = page.page_num();
            progress.on_page_start(page_num, total_pages);

            let text = match self.transcriber.transcribe(page).await {
                Ok(text) => text,
                Err(e) => {
                    progress.on_page_error(page_num, total_pages, &e.to_string());
                    return Err(e);
                }
            };

            transcription.push_page(&text);
            progress.on_page_complete(
                Progress {
                    completed: i + 1,
                    total: total_pages,
                },
                text.len(),
            );
        }
        Ok(transcription)
    }
}

/// Read `path` and transcribe it.
pub async fn transcribe_file(
    path: impl AsRef<Path>,
    pipeline: &Pipeline,
    progress: &dyn ConversionProgressCallback,
) -> Result<Transcription, Doc2TextError> {
    let upload = UploadedFile::from_path(path).await?;
    pipeline.run(&upload, progress).await
}
