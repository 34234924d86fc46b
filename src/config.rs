//! Configuration types for document transcription.
//!
//! All pipeline behaviour is controlled through [`TranscriptionConfig`],
//! built via its [`TranscriptionConfigBuilder`]. The config is an explicit
//! value handed to [`crate::convert::Pipeline`] and
//! [`crate::pipeline::llm::VlmTranscriber`] at construction; nothing in the
//! library reads provider or model choices from process-wide state.

use crate::error::Doc2TextError;
use serde::{Deserialize, Serialize};

/// Default provider: the original tool was built on Gemini.
pub const DEFAULT_PROVIDER: &str = "gemini";

/// Default multimodal model for the default provider.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Rasterisation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterConfig {
    /// Rendering DPI used when rasterising each PDF page. Range: 72–400. Default: 150.
    ///
    /// PDF page geometry is expressed in points (1/72 inch), so a page is
    /// scaled by `dpi / 72` before the pixel cap applies. 150 DPI keeps body
    /// text legible for the model without producing oversized uploads.
    pub dpi: u32,

    /// Maximum rendered image dimension (width or height) in pixels. Default: 2000.
    ///
    /// Caps either edge regardless of DPI so a poster-sized page cannot
    /// exhaust memory.
    pub max_rendered_pixels: u32,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            dpi: 150,
            max_rendered_pixels: 2000,
        }
    }
}

/// Remote model settings for the transcription client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriberConfig {
    /// LLM provider name (e.g. "gemini", "openai", "anthropic", "ollama").
    pub provider: String,

    /// Model identifier understood by the provider.
    pub model: String,

    /// Sampling temperature. Default: 0.1.
    ///
    /// Transcription wants the model to copy, not to invent.
    pub temperature: f32,

    /// Maximum tokens the model may generate per page. Default: 4096.
    pub max_tokens: usize,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.1,
            max_tokens: 4096,
        }
    }
}

impl TranscriberConfig {
    /// Environment variable holding the API key for this provider, if the
    /// provider needs one.
    pub fn api_key_var(&self) -> Option<&'static str> {
        match self.provider.to_ascii_lowercase().as_str() {
            "gemini" | "google" => Some("GEMINI_API_KEY"),
            "openai" => Some("OPENAI_API_KEY"),
            "anthropic" => Some("ANTHROPIC_API_KEY"),
            "mistral" => Some("MISTRAL_API_KEY"),
            "openrouter" => Some("OPENROUTER_API_KEY"),
            _ => None,
        }
    }

    /// Check that the provider's API key is present, using `lookup` to read
    /// variables.
    ///
    /// A missing or blank key is a fatal startup condition.
    pub fn require_api_key_with<F>(&self, lookup: F) -> Result<(), Doc2TextError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(var) = self.api_key_var() else {
            return Ok(());
        };
        match lookup(var) {
            Some(value) if !value.trim().is_empty() => Ok(()),
            _ => Err(Doc2TextError::MissingApiKey { var }),
        }
    }

    /// [`Self::require_api_key_with`] against the process environment.
    pub fn require_api_key(&self) -> Result<(), Doc2TextError> {
        self.require_api_key_with(|var| std::env::var(var).ok())
    }
}

/// Complete configuration for a transcription pipeline.
///
/// # Example
/// ```rust
/// use doc2text::TranscriptionConfig;
///
/// let config = TranscriptionConfig::builder()
///     .dpi(200)
///     .model("gemini-2.0-flash")
///     .build()
///     .unwrap();
/// assert_eq!(config.raster.dpi, 200);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    pub raster: RasterConfig,
    pub transcriber: TranscriberConfig,
}

impl TranscriptionConfig {
    /// Create a new builder for `TranscriptionConfig`.
    pub fn builder() -> TranscriptionConfigBuilder {
        TranscriptionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`TranscriptionConfig`].
#[derive(Debug)]
pub struct TranscriptionConfigBuilder {
    config: TranscriptionConfig,
}

impl TranscriptionConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.raster.dpi = dpi.clamp(72, 400);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.raster.max_rendered_pixels = px.max(100);
        self
    }

    pub fn provider(mut self, name: impl Into<String>) -> Self {
        self.config.transcriber.provider = name.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.transcriber.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.transcriber.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.transcriber.max_tokens = n;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<TranscriptionConfig, Doc2TextError> {
        let c = &self.config;
        if c.transcriber.provider.trim().is_empty() {
            return Err(Doc2TextError::InvalidConfig(
                "Provider name must not be empty".into(),
            ));
        }
        if c.transcriber.model.trim().is_empty() {
            return Err(Doc2TextError::InvalidConfig(
                "Model name must not be empty".into(),
            ));
        }
        if c.transcriber.max_tokens == 0 {
            return Err(Doc2TextError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = TranscriptionConfig::default();
        assert_eq!(c.raster.dpi, 150);
        assert_eq!(c.raster.max_rendered_pixels, 2000);
        assert_eq!(c.transcriber.provider, "gemini");
        assert_eq!(c.transcriber.model, DEFAULT_MODEL);
    }

    #[test]
    fn builder_clamps_dpi() {
        let c = TranscriptionConfig::builder().dpi(10).build().unwrap();
        assert_eq!(c.raster.dpi, 72);
        let c = TranscriptionConfig::builder().dpi(9000).build().unwrap();
        assert_eq!(c.raster.dpi, 400);
    }

    #[test]
    fn builder_rejects_empty_model() {
        let err = TranscriptionConfig::builder().model("  ").build().unwrap_err();
        assert_eq!(err.code(), "invalid_config");
    }

    #[test]
    fn api_key_required_for_gemini() {
        let c = TranscriberConfig::default();
        let err = c.require_api_key_with(|_| None).unwrap_err();
        assert!(matches!(
            err,
            Doc2TextError::MissingApiKey {
                var: "GEMINI_API_KEY"
            }
        ));
        assert!(c
            .require_api_key_with(|_| Some("   ".to_string()))
            .is_err());
        assert!(c
            .require_api_key_with(|v| (v == "GEMINI_API_KEY").then(|| "k".to_string()))
            .is_ok());
    }

    #[test]
    fn local_provider_needs_no_key() {
        let c = TranscriberConfig {
            provider: "ollama".into(),
            ..Default::default()
        };
        assert_eq!(c.api_key_var(), None);
        assert!(c.require_api_key_with(|_| None).is_ok());
    }
}
