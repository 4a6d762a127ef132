// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod aggregate;
pub mod api;
pub mod classify;
pub mod config;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod pipeline;
pub mod report;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::AggregatedReport;
pub use crate::api::router;
pub use crate::classify::{ClassificationResult, ClassifiedArticle, RelevanceClassifier};
pub use crate::config::AppConfig;
pub use crate::error::PipelineError;
pub use crate::pipeline::{ErrorPolicy, Pipeline, RunOutcome};

use anyhow::Context;
use tracing::info;

/// Build the HTTP app from the process environment: config file + credentials,
/// live news search, configured generation provider.
///
/// Fails (without any remote call) when a credential is missing.
pub fn app_from_env() -> anyhow::Result<axum::Router> {
    let cfg = AppConfig::load().context("loading curator config")?;
    log_config(&cfg);
    let pipeline = Pipeline::from_config(&cfg).context("building pipeline")?;
    Ok(router(api::AppState::new(pipeline)))
}

/// Startup summary. Credentials appear only as present/absent.
fn log_config(cfg: &AppConfig) {
    info!(
        provider = cfg.ai.provider.as_str(),
        search_key_present = !cfg.search_key().is_empty(),
        ai_key_present = !cfg.ai_key().is_empty(),
        "curator config loaded"
    );
}
