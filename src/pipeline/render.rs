//! Rasterisation: turn a validated document into ordered page images.
//!
//! PDFs go through pdfium, one bitmap per page, in document order. PNG and
//! JPEG uploads are decoded with the `image` crate and become a one-page
//! sequence.
//!
//! ## Why spawn_blocking?
//!
//! pdfium wraps a C++ library with thread-local state and does CPU-heavy
//! work. [`render_document`] moves [`rasterize`] onto the blocking pool so
//! the async runtime (and the web server's progress endpoint) keeps running.

use crate::config::RasterConfig;
use crate::document::{DocumentKind, PageImage, ValidatedDocument};
use crate::error::Doc2TextError;
use image::ImageFormat;
use pdfium_render::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info};

/// PDF user space unit: 1/72 inch.
const POINTS_PER_INCH: f32 = 72.0;

/// Rasterise `doc` without blocking the async runtime.
pub async fn render_document(
    doc: &ValidatedDocument,
    config: &RasterConfig,
) -> Result<Vec<PageImage>, Doc2TextError> {
    let doc = doc.clone();
    let config = *config;

    tokio::task::spawn_blocking(move || rasterize(&doc, &config))
        .await
        .map_err(|e| Doc2TextError::Internal(format!("Render task panicked: {}", e)))?
}

/// Rasterise `doc` into page images, in page order.
///
/// Blocking; a pure function of the input bytes and config.
pub fn rasterize(
    doc: &ValidatedDocument,
    config: &RasterConfig,
) -> Result<Vec<PageImage>, Doc2TextError> {
    let pages = match doc.kind() {
        DocumentKind::Pdf => rasterize_pdf(doc.bytes(), config)?,
        DocumentKind::Png => vec![decode_image(doc.bytes(), ImageFormat::Png)?],
        DocumentKind::Jpeg => vec![decode_image(doc.bytes(), ImageFormat::Jpeg)?],
    };
    ensure_not_empty(pages)
}

fn ensure_not_empty(pages: Vec<PageImage>) -> Result<Vec<PageImage>, Doc2TextError> {
    if pages.is_empty() {
        return Err(Doc2TextError::EmptyDocument);
    }
    Ok(pages)
}

fn decode_image(bytes: &[u8], format: ImageFormat) -> Result<PageImage, Doc2TextError> {
    let image = image::load_from_memory_with_format(bytes, format).map_err(|e| {
        Doc2TextError::Decode {
            detail: format!("{:?} image: {}", format, e),
        }
    })?;
    debug!("Decoded image → {}x{} px", image.width(), image.height());
    Ok(PageImage::new(0, image))
}

fn rasterize_pdf(bytes: &[u8], config: &RasterConfig) -> Result<Vec<PageImage>, Doc2TextError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| Doc2TextError::Decode {
            detail: format!("PDF could not be opened: {:?}", e),
        })?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    let max_pixels = config.max_rendered_pixels as i32;
    let render_config = PdfRenderConfig::new()
        .scale_page_by_factor(config.dpi as f32 / POINTS_PER_INCH)
        .set_maximum_width(max_pixels)
        .set_maximum_height(max_pixels);

    let mut results = Vec::with_capacity(total_pages);
    for (idx, page) in pages.iter().enumerate() {
        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| Doc2TextError::Decode {
                detail: format!("page {} could not be rendered: {:?}", idx + 1, e),
            })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            idx + 1,
            image.width(),
            image.height()
        );
        results.push(PageImage::new(idx, image));
    }

    Ok(results)
}

/// Bind to a pdfium library.
///
/// Lookup order: `PDFIUM_LIB_PATH`, then the platform library name in the
/// working directory, then the system library.
pub fn bind_pdfium() -> Result<Pdfium, Doc2TextError> {
    let bindings = match std::env::var_os("PDFIUM_LIB_PATH") {
        Some(path) => Pdfium::bind_to_library(PathBuf::from(path)),
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| Doc2TextError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}
