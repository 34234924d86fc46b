//! Presentation state: the upload → transcript → download / start-over loop.
//!
//! The session is an explicit value. Every interaction takes the current
//! [`SessionState`] and an event, and returns the next state together with
//! the [`View`] to show. Nothing is kept between calls except what the
//! caller stores.
//!
//! Every interaction begins with a render cycle that honours a pending reset
//! request, so `reset_requested` is never observed as `true` afterwards.

use crate::convert::Pipeline;
use crate::document::{Transcription, UploadedFile};
use crate::progress::ConversionProgressCallback;
use tracing::info;

/// Name of the downloaded transcript file.
pub const DOWNLOAD_FILE_NAME: &str = "transcricao.txt";

/// Per-session presentation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// The last successful transcript, if any.
    pub transcription: Option<Transcription>,
    /// Set by "start over"; consumed at the start of the next cycle.
    pub reset_requested: bool,
}

impl SessionState {
    /// Apply a pending reset: clear the transcript and the flag together.
    pub fn begin_cycle(mut self) -> Self {
        if self.reset_requested {
            self.transcription = None;
            self.reset_requested = false;
        }
        self
    }

    /// The downloadable file for the current transcript.
    pub fn download(&self) -> Option<Download> {
        self.transcription.as_ref().map(Download::of)
    }
}

/// A file offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: &'static str,
    pub content: Vec<u8>,
}

impl Download {
    /// The transcript as UTF-8 bytes, byte for byte.
    pub fn of(transcription: &Transcription) -> Self {
        Self {
            file_name: DOWNLOAD_FILE_NAME,
            content: transcription.as_str().as_bytes().to_vec(),
        }
    }
}

/// Something the user did.
#[derive(Debug)]
pub enum UiEvent {
    /// Plain page load.
    Render,
    /// A file was chosen in the upload control.
    Upload(UploadedFile),
    /// The "download" action.
    Download,
    /// The "start over" action.
    StartOver,
}

/// What to show after an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// The upload control, with the message of a failed run if there was one.
    Upload { error: Option<String> },
    /// The transcript in a read-only text area, with download and start-over.
    Transcript { text: String },
    /// A file to hand to the browser.
    Download(Download),
}

/// Result of one interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub state: SessionState,
    pub view: View,
}

/// Drives the session against a pipeline.
#[derive(Clone)]
pub struct Presenter {
    pipeline: Pipeline,
}

impl Presenter {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    /// Handle one interaction.
    ///
    /// An upload blocks until the whole pipeline has finished. On failure
    /// the transcript stays absent and the view carries the error message.
    pub async fn interact(
        &self,
        state: SessionState,
        event: UiEvent,
        progress: &dyn ConversionProgressCallback,
    ) -> Step {
        let mut state = state.begin_cycle();

        match event {
            UiEvent::Render => Self::settle(state, None),
            UiEvent::Upload(upload) => {
                if state.transcription.is_some() {
                    // The upload control is not shown while a transcript is.
                    return Self::settle(state, None);
                }
                match self.pipeline.run(&upload, progress).await {
                    Ok(transcription) => {
                        info!(
                            "Stored transcript of {} pages for '{}'",
                            transcription.page_count(),
                            upload.file_name
                        );
                        state.transcription = Some(transcription);
                        Self::settle(state, None)
                    }
                    Err(e) => Self::settle(state, Some(e.user_message())),
                }
            }
            UiEvent::Download => match state.download() {
                Some(file) => Step {
                    state,
                    view: View::Download(file),
                },
                None => Self::settle(state, None),
            },
            UiEvent::StartOver => {
                state.reset_requested = true;
                Self::settle(state.begin_cycle(), None)
            }
        }
    }

    fn settle(state: SessionState, error: Option<String>) -> Step {
        let view = match state.transcription {
            Some(ref t) => View::Transcript {
                text: t.as_str().to_string(),
            },
            None => View::Upload { error },
        };
        Step { state, view }
    }
}
