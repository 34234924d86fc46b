//! Data model: what flows between pipeline stages.
//!
//! ```text
//! UploadedFile ──validate──▶ ValidatedDocument ──rasterize──▶ Vec<PageImage>
//!                                                                   │
//!                         Transcription ◀──── transcribe, per page ─┘
//! ```

use crate::error::Doc2TextError;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Raw upload: bytes plus the filename the client declared.
///
/// The filename is informational only. The document type is always derived
/// from the content.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a local file into an upload.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, Doc2TextError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| Doc2TextError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { file_name, bytes })
    }
}

impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// The three accepted content types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Pdf,
    Png,
    Jpeg,
}

impl DocumentKind {
    pub fn mime_type(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Png => "image/png",
            DocumentKind::Jpeg => "image/jpeg",
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/pdf" => Some(DocumentKind::Pdf),
            "image/png" => Some(DocumentKind::Png),
            "image/jpeg" => Some(DocumentKind::Jpeg),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// An upload whose content type has been confirmed.
///
/// Only [`crate::pipeline::validate::validate_upload`] creates one, so the
/// kind is always one of the accepted three.
#[derive(Debug, Clone)]
pub struct ValidatedDocument {
    upload: UploadedFile,
    kind: DocumentKind,
}

impl ValidatedDocument {
    pub(crate) fn new(upload: UploadedFile, kind: DocumentKind) -> Self {
        Self { upload, kind }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn bytes(&self) -> &[u8] {
        &self.upload.bytes
    }

    pub fn file_name(&self) -> &str {
        &self.upload.file_name
    }
}

/// One rasterised page.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// 0-based position in the document.
    pub index: usize,
    pub image: DynamicImage,
}

impl PageImage {
    pub fn new(index: usize, image: DynamicImage) -> Self {
        Self { index, image }
    }

    /// 1-based page number, for messages.
    pub fn page_num(&self) -> usize {
        self.index + 1
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// The assembled transcript: every page's text followed by `"\n"`, in page
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcription {
    text: String,
    page_count: usize,
}

impl Transcription {
    /// Assemble a transcript from per-page texts in page order.
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut t = Self::default();
        for page in pages {
            t.push_page(page.as_ref());
        }
        t
    }

    pub(crate) fn push_page(&mut self, text: &str) {
        self.text.push_str(text);
        self.text.push('\n');
        self.page_count += 1;
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of pages that contributed text.
    pub fn page_count(&self) -> usize {
        self.page_count
    }
}

impl fmt::Display for Transcription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
