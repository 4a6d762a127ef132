// src/classify/mod.rs
//! Relevance classification: prompt → generation call → fence strip → strict parse.

pub mod ai_adapter;
pub mod fence;
pub mod prompt;
pub mod reply;

use std::time::{Duration, Instant};

use metrics::histogram;
use serde::{Deserialize, Serialize};

use crate::config::Taxonomy;
use crate::error::{PipelineError, Result};
use crate::ingest::{article_id, RawArticle};

pub use ai_adapter::{DynProvider, MockProvider, Provider};
pub use fence::strip_fence;
pub use prompt::build_prompt;
pub use reply::parse_reply;

/// One curated article. Flat string fields so any renderer can consume it as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedArticle {
    pub publication_date: String, // dd/mm/yyyy
    pub title: String,
    pub source: String,
    pub link: String,
    pub category: String, // always a taxonomy label
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationResult {
    /// Judged out of domain by the model.
    Discarded,
    Classified(ClassifiedArticle),
}

pub struct RelevanceClassifier {
    provider: DynProvider,
    taxonomy: Taxonomy,
    timeout: Duration,
}

impl RelevanceClassifier {
    pub fn new(provider: DynProvider, taxonomy: Taxonomy, timeout: Duration) -> Self {
        Self {
            provider,
            taxonomy,
            timeout,
        }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Classify one article. Blocks for the remote round-trip, bounded by the timeout.
    pub async fn classify(&self, article: &RawArticle) -> Result<ClassificationResult> {
        let prompt = build_prompt(article, &self.taxonomy);
        let t0 = Instant::now();

        let reply = match tokio::time::timeout(self.timeout, self.provider.generate(&prompt)).await {
            Ok(r) => r?,
            Err(_) => {
                return Err(PipelineError::RemoteCall(format!(
                    "{} call timed out after {}s",
                    self.provider.name(),
                    self.timeout.as_secs_f32()
                )))
            }
        };

        histogram!("classify_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        tracing::debug!(
            target: "classify",
            id = %article_id(&article.url),
            provider = self.provider.name(),
            reply_len = reply.len(),
            "generation reply received"
        );

        parse_reply(&reply, article, &self.taxonomy)
    }
}
