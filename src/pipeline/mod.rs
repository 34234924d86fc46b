//! Pipeline stages for document transcription.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested on its own.
//!
//! ## Data Flow
//!
//! ```text
//! validate ──▶ render ──▶ encode ──▶ llm
//!  (infer)    (pdfium)    (base64)   (VLM)
//! ```
//!
//! 1. [`validate`] — sniff the content type; only PDF, PNG and JPEG pass
//! 2. [`render`]   — rasterise every page; runs in `spawn_blocking` because
//!    pdfium is not async-safe
//! 3. [`encode`]   — PNG-encode and base64-wrap each page for the request body
//! 4. [`llm`]      — the only stage with network I/O; one call per page

pub mod encode;
pub mod llm;
pub mod render;
pub mod validate;
