//! Content-type validation: accept PDF, PNG and JPEG, reject everything else.
//!
//! The declared filename and extension are never trusted. The type comes
//! from the magic bytes via [`infer`].

use crate::document::{DocumentKind, UploadedFile, ValidatedDocument};
use crate::error::Doc2TextError;
use tracing::debug;

/// Reported for content that no known signature matches.
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// Reported for a zero-length upload.
pub const EMPTY_MIME: &str = "application/x-empty";

/// Sniff the MIME type of `bytes`.
pub fn detect_mime(bytes: &[u8]) -> &'static str {
    if bytes.is_empty() {
        return EMPTY_MIME;
    }
    infer::get(bytes)
        .map(|t| t.mime_type())
        .unwrap_or(UNKNOWN_MIME)
}

/// Determine the document kind of `bytes`, failing for anything that is not
/// a PDF, PNG or JPEG.
pub fn validate(bytes: &[u8]) -> Result<DocumentKind, Doc2TextError> {
    let mime = detect_mime(bytes);
    debug!("Detected MIME type {} ({} bytes)", mime, bytes.len());
    DocumentKind::from_mime(mime).ok_or_else(|| Doc2TextError::UnsupportedType {
        mime: mime.to_string(),
    })
}

/// Validate an upload and tag it with its confirmed kind.
pub fn validate_upload(upload: UploadedFile) -> Result<ValidatedDocument, Doc2TextError> {
    let kind = validate(&upload.bytes)?;
    Ok(ValidatedDocument::new(upload, kind))
}
