//! Web server binary for doc2text.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `TranscriptionConfig`, checks the API key, and serves the UI.

use anyhow::{Context, Result};
use clap::Parser;
use doc2text::web::{build_router, AppState};
use doc2text::{Pipeline, TranscriptionConfig};
use std::io;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve on the default address with Gemini
  export GEMINI_API_KEY=...
  doc2text

  # Another provider and model, on all interfaces
  doc2text --provider openai --model gpt-4.1-mini --bind 0.0.0.0:8501

  # Sharper renders for small print
  doc2text --dpi 250

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY      Google Gemini API key (default provider). GOOGLE_API_KEY
                      is not read; rename it in an existing .env file.
  OPENAI_API_KEY      OpenAI API key
  ANTHROPIC_API_KEY   Anthropic API key
  PDFIUM_LIB_PATH     Path to libpdfium; otherwise ./ then the system library
  RUST_LOG            Log filter, overrides --verbose

  Variables may also be placed in a .env file in the working directory.
"#;

/// Transcribe PDF and image uploads to plain text with a Vision LLM.
#[derive(Parser, Debug)]
#[command(
    name = "doc2text",
    version,
    about = "Serve a web UI that transcribes PDF and image uploads to plain text",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Address to listen on.
    #[arg(long, env = "DOC2TEXT_BIND", default_value = "127.0.0.1:8501")]
    bind: SocketAddr,

    /// LLM provider: gemini, openai, anthropic, ollama, …
    #[arg(long, env = "DOC2TEXT_PROVIDER", default_value = doc2text::config::DEFAULT_PROVIDER)]
    provider: String,

    /// Vision model ID.
    #[arg(long, env = "DOC2TEXT_MODEL", default_value = doc2text::config::DEFAULT_MODEL)]
    model: String,

    /// Rendering DPI for PDF pages (72–400).
    #[arg(long, env = "DOC2TEXT_DPI", default_value_t = 150,
          value_parser = clap::value_parser!(u32).range(72..=400))]
    dpi: u32,

    /// Largest accepted upload, in megabytes.
    #[arg(long, env = "DOC2TEXT_MAX_UPLOAD_MB", default_value_t = 50)]
    max_upload_mb: usize,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOC2TEXT_VERBOSE")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap so its `env =` fallbacks see the file.
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    info!("Starting doc2text v{}", env!("CARGO_PKG_VERSION"));
    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let config = TranscriptionConfig::builder()
        .provider(&cli.provider)
        .model(&cli.model)
        .dpi(cli.dpi)
        .build()
        .context("Invalid configuration")?;

    // A missing key stops the process before anything is served.
    config
        .transcriber
        .require_api_key()
        .context("Cannot start without an API key")?;

    let pipeline = Pipeline::from_config(&config).context("Failed to create LLM provider")?;
    let raster = pipeline.raster_config();
    info!(
        "Using provider '{}' with model '{}' at {} DPI (max {} px)",
        config.transcriber.provider, config.transcriber.model, raster.dpi, raster.max_rendered_pixels
    );

    // ── Serve ────────────────────────────────────────────────────────────
    let state = AppState::new(pipeline, cli.max_upload_mb.saturating_mul(1024 * 1024));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("Failed to bind {}", cli.bind))?;
    info!("doc2text listening on http://{}", cli.bind);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
