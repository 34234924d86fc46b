//! Fixtures shared by the unit tests.

use crate::document::PageImage;
use crate::error::Doc2TextError;
use crate::pipeline::llm::Transcriber;
use crate::progress::{ConversionProgressCallback, Progress};
use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::Mutex;

pub fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    encode(w, h, ImageFormat::Png)
}

pub fn jpeg_bytes(w: u32, h: u32) -> Vec<u8> {
    encode(w, h, ImageFormat::Jpeg)
}

fn encode(w: u32, h: u32, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([250, 250, 250])));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format)
        .expect("in-memory encode");
    buf
}

/// Build a blank PDF with one page per `(width, height)` in points.
///
/// The xref offsets are computed so the file is well-formed without repair.
pub fn minimal_pdf(pages: &[(u32, u32)]) -> Vec<u8> {
    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            (0..pages.len())
                .map(|i| format!("{} 0 R", i + 3))
                .collect::<Vec<_>>()
                .join(" "),
            pages.len()
        ),
    ];
    for (w, h) in pages {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {w} {h}] /Resources << >> >>"
        ));
    }

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }
    let xref_at = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for off in offsets {
        out.extend_from_slice(format!("{off:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_at
        )
        .as_bytes(),
    );
    out
}

pub fn page(index: usize) -> PageImage {
    PageImage::new(
        index,
        DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([0, 0, 0]))),
    )
}

/// Returns canned text per call, in order; `Err(detail)` entries fail.
pub struct ScriptedTranscriber {
    replies: Mutex<Vec<Result<String, String>>>,
    pub seen: Mutex<Vec<usize>>,
}

impl ScriptedTranscriber {
    pub fn new(replies: Vec<Result<&str, &str>>) -> Self {
        let mut replies: Vec<Result<String, String>> = replies
            .into_iter()
            .map(|r| r.map(str::to_string).map_err(str::to_string))
            .collect();
        replies.reverse();
        Self {
            replies: Mutex::new(replies),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn transcribe(&self, page: &PageImage) -> Result<String, Doc2TextError> {
        self.seen.lock().unwrap().push(page.index);
        match self.replies.lock().unwrap().pop() {
            Some(Ok(text)) => Ok(text),
            Some(Err(detail)) => Err(Doc2TextError::TranscriptionService {
                page: page.page_num(),
                detail,
            }),
            None => Err(Doc2TextError::TranscriptionService {
                page: page.page_num(),
                detail: "script exhausted".into(),
            }),
        }
    }
}

/// Records every callback for later assertions.
#[derive(Default)]
pub struct RecordingProgress {
    pub started: Mutex<Option<usize>>,
    pub fractions: Mutex<Vec<f32>>,
    pub errors: Mutex<Vec<usize>>,
}

impl ConversionProgressCallback for RecordingProgress {
    fn on_conversion_start(&self, total_pages: usize) {
        *self.started.lock().unwrap() = Some(total_pages);
    }

    fn on_page_complete(&self, progress: Progress, _text_len: usize) {
        self.fractions.lock().unwrap().push(progress.fraction());
    }

    fn on_page_error(&self, page_num: usize, _total_pages: usize, _error: &str) {
        self.errors.lock().unwrap().push(page_num);
    }
}
