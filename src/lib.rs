// src/lib.rs
// Public library surface for the binary, integration tests and reuse.

pub mod analyze;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod history;
pub mod metrics;
pub mod ocr;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{analyze, AnalysisParams, AnalysisResult, Analyzer, Tone};
pub use crate::api::{router, AppState};
pub use crate::config::AppConfig;

use axum::Router;
use tracing::info;

/// Full application: config from `$ANALYZER_CONFIG_PATH` / `config/analyzer.toml`,
/// Tesseract OCR, file-backed stores.
pub async fn app() -> anyhow::Result<Router> {
    let config = AppConfig::load_default()?;
    info!(
        upload_dir = %config.storage.upload_dir.display(),
        history_cap = config.storage.history_cap,
        language = config.lexicon.language.as_deref().unwrap_or("english"),
        "analyzer config loaded"
    );
    let state = AppState::from_config(config)?;
    Ok(router(state))
}
