//! Transcription client: one page image in, the model's text out.
//!
//! [`Transcriber`] is the seam the orchestrator depends on. The production
//! implementation, [`VlmTranscriber`], sends the page as a base64 PNG plus
//! [`TRANSCRIPTION_INSTRUCTION`] in a single user message through an
//! `edgequake-llm` provider and returns the reply verbatim.
//!
//! There is no retry here. A transport error, a reply with no text, or an
//! encoding failure becomes [`Doc2TextError::TranscriptionService`] and ends
//! the run.

use crate::config::TranscriberConfig;
use crate::document::PageImage;
use crate::error::Doc2TextError;
use crate::pipeline::encode;
use crate::prompts::TRANSCRIPTION_INSTRUCTION;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Extracts the text of a single page.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, page: &PageImage) -> Result<String, Doc2TextError>;
}

/// [`Transcriber`] backed by a vision-capable LLM provider.
pub struct VlmTranscriber {
    provider: Arc<dyn LLMProvider>,
    options: CompletionOptions,
}

impl VlmTranscriber {
    /// Wrap an already constructed provider.
    pub fn new(provider: Arc<dyn LLMProvider>, config: &TranscriberConfig) -> Self {
        Self {
            provider,
            options: build_options(config),
        }
    }

    /// Construct the provider named in `config`.
    ///
    /// The provider reads its API key when it is created; callers check the
    /// key first with [`TranscriberConfig::require_api_key`] so a missing
    /// key is reported by name.
    pub fn from_config(config: &TranscriberConfig) -> Result<Self, Doc2TextError> {
        let provider = ProviderFactory::create_llm_provider(&config.provider, &config.model)
            .map_err(|e| Doc2TextError::ProviderNotConfigured {
                provider: config.provider.clone(),
                hint: format!("{e}"),
            })?;
        Ok(Self::new(provider, config))
    }
}

#[async_trait]
impl Transcriber for VlmTranscriber {
    async fn transcribe(&self, page: &PageImage) -> Result<String, Doc2TextError> {
        let start = Instant::now();
        let page_num = page.page_num();
        let image_data = encode::encode_page(page)?;

        let messages = vec![ChatMessage::user_with_images(
            TRANSCRIPTION_INSTRUCTION,
            vec![image_data],
        )];

        let response = self
            .provider
            .chat(&messages, Some(&self.options))
            .await
            .map_err(|e| {
                warn!("Page {}: transcription request failed — {}", page_num, e);
                Doc2TextError::TranscriptionService {
                    page: page_num,
                    detail: e.to_string(),
                }
            })?;

        debug!(
            "Page {}: {} input tokens, {} output tokens, {:?}",
            page_num,
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );

        ensure_text(page_num, response.content)
    }
}

/// Reject replies that carry no text.
fn ensure_text(page_num: usize, content: String) -> Result<String, Doc2TextError> {
    if content.trim().is_empty() {
        return Err(Doc2TextError::TranscriptionService {
            page: page_num,
            detail: "the model returned no text".into(),
        });
    }
    Ok(content)
}

/// Build `CompletionOptions` from the transcriber config.
fn build_options(config: &TranscriberConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}
