//! Progress-callback trait for per-page transcription events.
//!
//! Pass a `&dyn ConversionProgressCallback` to
//! [`crate::convert::Pipeline::run`] to receive events as each page is
//! transcribed. Pages are handled strictly in order, one at a time, so every
//! callback fires from the task that drives the run.
//!
//! [`ProgressCell`] is the implementation the web UI uses: it keeps only the
//! latest completed fraction so a polling request can read it while the run
//! is still in flight.
//!
//! # Example
//!
//! ```rust
//! use doc2text::{ConversionProgressCallback, Progress};
//!
//! struct Printer;
//!
//! impl ConversionProgressCallback for Printer {
//!     fn on_page_complete(&self, progress: Progress, text_len: usize) {
//!         eprintln!("{:.0}% ({} chars)", progress.fraction() * 100.0, text_len);
//!     }
//! }
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Pages completed out of the total, after a page finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Completed fraction in `0.0..=1.0`.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f32 / self.total as f32
        }
    }
}

/// Called by the pipeline as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once, after rasterisation, when the page count is known.
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before the remote request is sent for a page.
    ///
    /// * `page_num` — 1-indexed page number
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called after a page's text has been appended to the transcript.
    ///
    /// * `text_len` — byte length of the page text
    fn on_page_complete(&self, progress: Progress, text_len: usize) {
        let _ = (progress, text_len);
    }

    /// Called when a page fails. The run stops right after this call.
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias for a shared callback.
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

/// Latest completed fraction, readable from another task.
///
/// The `f32` is stored as its bit pattern in an `AtomicU32`.
#[derive(Debug, Default)]
pub struct ProgressCell {
    bits: AtomicU32,
}

impl ProgressCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Acquire))
    }

    pub fn set(&self, fraction: f32) {
        self.bits
            .store(fraction.clamp(0.0, 1.0).to_bits(), Ordering::Release);
    }

    pub fn reset(&self) {
        self.set(0.0);
    }
}

impl ConversionProgressCallback for ProgressCell {
    fn on_conversion_start(&self, _total_pages: usize) {
        self.reset();
    }

    fn on_page_complete(&self, progress: Progress, _text_len: usize) {
        self.set(progress.fraction());
    }
}
