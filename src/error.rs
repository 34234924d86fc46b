//! Error types for the doc2text library.
//!
//! Every failure in a run is fatal for that run: the first error stops the
//! pipeline and no partial transcript survives. [`Doc2TextError`] therefore
//! covers both the per-run taxonomy (unsupported type, corrupt document,
//! empty document, remote service failure) and the startup conditions that
//! stop the process before any UI is served (missing API key, no pdfium).
//!
//! Each variant carries a stable [`Doc2TextError::code`] so operators can
//! grep logs for a failure class without parsing the human message.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the doc2text library.
#[derive(Debug, Error)]
pub enum Doc2TextError {
    // ── Validation ────────────────────────────────────────────────────────
    /// Content sniffing found a type other than PDF, PNG or JPEG.
    #[error("Unsupported file type: {mime}\nUpload a PDF, PNG or JPEG file.")]
    UnsupportedType { mime: String },

    // ── Rasterisation ─────────────────────────────────────────────────────
    /// The payload passed validation but could not be decoded.
    #[error("Could not decode document: {detail}")]
    Decode { detail: String },

    /// The document decoded to zero pages.
    #[error("No pages found in the document")]
    EmptyDocument,

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium, place the library in the working\n\
directory, or install it system-wide.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Transcription ─────────────────────────────────────────────────────
    /// The remote model call failed or returned no text.
    #[error("Transcription service failed on page {page}: {detail}")]
    TranscriptionService { page: usize, detail: String },

    /// The configured provider could not be constructed.
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── Startup ───────────────────────────────────────────────────────────
    /// The provider's API key is absent from the environment.
    #[error("API key not found: set {var} in the environment or in a .env file")]
    MissingApiKey { var: &'static str },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── I/O ───────────────────────────────────────────────────────────────
    /// Reading an input file from disk failed.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Doc2TextError {
    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Doc2TextError::UnsupportedType { .. } => "unsupported_type",
            Doc2TextError::Decode { .. } => "decode_error",
            Doc2TextError::EmptyDocument => "empty_document",
            Doc2TextError::PdfiumBindingFailed(_) => "pdfium_binding_failed",
            Doc2TextError::TranscriptionService { .. } => "transcription_service_error",
            Doc2TextError::ProviderNotConfigured { .. } => "provider_not_configured",
            Doc2TextError::MissingApiKey { .. } => "missing_api_key",
            Doc2TextError::InvalidConfig(_) => "invalid_config",
            Doc2TextError::Io { .. } => "io_error",
            Doc2TextError::Internal(_) => "internal_error",
        }
    }

    /// Message shown to the person using the UI.
    pub fn user_message(&self) -> String {
        format!("Error processing the file: {self}")
    }
}
