//! Image encoding: `PageImage` → base64 PNG wrapped in `ImageData`.
//!
//! This is the single transport encoding for page images. PNG is lossless,
//! so rendered text stays crisp whether the page came from pdfium or from a
//! JPEG upload. `detail: "high"` asks GPT-class models for the full tile
//! budget; providers that don't know the hint ignore it.

use crate::document::PageImage;
use crate::error::Doc2TextError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::ImageData;
use std::io::Cursor;
use tracing::debug;

/// Encode a page as a base64 PNG ready for the multimodal API.
pub fn encode_page(page: &PageImage) -> Result<ImageData, Doc2TextError> {
    let mut buf = Vec::new();
    page.image
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| Doc2TextError::TranscriptionService {
            page: page.page_num(),
            detail: format!("Image encoding failed: {e}"),
        })?;

    let b64 = STANDARD.encode(&buf);
    debug!("Page {}: encoded image → {} bytes base64", page.page_num(), b64.len());

    Ok(ImageData::new(b64, "image/png").with_detail("high"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};

    #[test]
    fn encodes_png_preserving_dimensions() {
        let page = PageImage::new(
            0,
            DynamicImage::ImageRgb8(RgbImage::from_pixel(12, 7, Rgb([255, 0, 0]))),
        );
        let data = encode_page(&page).expect("encode should succeed");
        assert_eq!(data.mime_type, "image/png");

        let decoded = STANDARD.decode(&data.data).expect("valid base64");
        let img = image::load_from_memory(&decoded).expect("valid PNG");
        assert_eq!((img.width(), img.height()), (12, 7));
    }
}
