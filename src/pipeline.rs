// src/pipeline.rs
//! One curation run: fetch → classify each article in order → aggregate.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::aggregate::{self, AggregatedReport};
use crate::classify::ai_adapter::build_provider;
use crate::classify::{ClassificationResult, RelevanceClassifier};
use crate::config::AppConfig;
use crate::error::{PipelineError, Result};
use crate::ingest::providers::NewsApiSource;
use crate::ingest::{article_id, ArticleSource, QuerySpec, RawArticle};

/// What to do when one article cannot be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Treat the failure like a discard.
    SkipSilently,
    /// Continue, but record the failure in the run outcome.
    #[default]
    SkipAndReport,
    /// Stop the whole run with the error.
    AbortRun,
}

impl ErrorPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorPolicy::SkipSilently => "skip_silently",
            ErrorPolicy::SkipAndReport => "skip_and_report",
            ErrorPolicy::AbortRun => "abort_run",
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "skip_silently" => Ok(ErrorPolicy::SkipSilently),
            "skip_and_report" => Ok(ErrorPolicy::SkipAndReport),
            "abort_run" => Ok(ErrorPolicy::AbortRun),
            other => Err(format!(
                "unknown error policy '{other}' (expected skip_silently, skip_and_report or abort_run)"
            )),
        }
    }
}

/// A skipped article, as reported under [`ErrorPolicy::SkipAndReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleFailure {
    pub title: String,
    pub link: String,
    pub kind: &'static str,
    pub message: String,
}

impl ArticleFailure {
    fn new(article: &RawArticle, err: &PipelineError) -> Self {
        Self {
            title: article.title.clone(),
            link: article.url.clone(),
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    #[serde(rename = "records")]
    pub report: AggregatedReport,
    pub failures: Vec<ArticleFailure>,
}

impl RunOutcome {
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

pub struct Pipeline {
    source: Box<dyn ArticleSource>,
    query: QuerySpec,
    classifier: RelevanceClassifier,
    policy: ErrorPolicy,
    source_timeout: Duration,
}

impl Pipeline {
    pub fn new(
        source: Box<dyn ArticleSource>,
        query: QuerySpec,
        classifier: RelevanceClassifier,
        policy: ErrorPolicy,
        source_timeout: Duration,
    ) -> Self {
        Self {
            source,
            query,
            classifier,
            policy,
            source_timeout,
        }
    }

    /// Live search + configured generation provider. Credentials must be resolved.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let timeout = cfg.remote_timeout();
        let source = NewsApiSource::new(cfg.search.endpoint.clone(), cfg.search_key(), timeout)?;
        let provider = build_provider(cfg)?;
        let classifier = RelevanceClassifier::new(provider, cfg.taxonomy.clone(), timeout);
        info!(
            target: "pipeline",
            provider = classifier.provider_name(),
            model = cfg.ai.model(),
            policy = %cfg.on_error,
            categories = cfg.taxonomy.len(),
            "pipeline configured"
        );
        Ok(Self::new(
            Box::new(source),
            cfg.search.query_spec(),
            classifier,
            cfg.on_error,
            timeout,
        ))
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    pub fn classifier(&self) -> &RelevanceClassifier {
        &self.classifier
    }

    /// Run against the configured source.
    pub async fn run(&self) -> Result<RunOutcome> {
        self.run_from(self.source.as_ref()).await
    }

    /// Run against another source (manual entries, simulated news) with the same
    /// classifier and policy.
    pub async fn run_from(&self, source: &dyn ArticleSource) -> Result<RunOutcome> {
        crate::metrics::describe_metrics();
        counter!("pipeline_runs_total").increment(1);

        let articles = match tokio::time::timeout(self.source_timeout, source.fetch(&self.query)).await {
            Ok(Ok(v)) => v,
            Ok(Err(e)) => {
                warn!(target: "pipeline", source = source.name(), error = %e, "source failed; run aborted");
                return Err(e);
            }
            Err(_) => {
                counter!("source_errors_total").increment(1);
                let e = PipelineError::SourceUnavailable(format!(
                    "{} timed out after {}s",
                    source.name(),
                    self.source_timeout.as_secs_f32()
                ));
                warn!(target: "pipeline", source = source.name(), error = %e, "source failed; run aborted");
                return Err(e);
            }
        };

        info!(target: "pipeline", source = source.name(), fetched = articles.len(), "articles fetched");
        self.process(&articles).await
    }

    /// Classify `articles` one by one, in order, applying the error policy.
    pub async fn process(&self, articles: &[RawArticle]) -> Result<RunOutcome> {
        let mut results = Vec::with_capacity(articles.len());
        let mut failures = Vec::new();
        let mut discarded = 0usize;
        let mut skipped = 0usize;

        for article in articles {
            counter!("pipeline_articles_total").increment(1);
            let id = article_id(&article.url);

            match self.classifier.classify(article).await {
                Ok(r) => {
                    if r == ClassificationResult::Discarded {
                        discarded += 1;
                        counter!("pipeline_discarded_total").increment(1);
                        debug!(target: "pipeline", %id, "discarded");
                    }
                    results.push(r);
                }
                Err(e) if !e.is_per_article() => return Err(e),
                Err(e) => {
                    counter!("pipeline_failures_total", "kind" => e.kind()).increment(1);
                    match self.policy {
                        ErrorPolicy::AbortRun => {
                            warn!(target: "pipeline", %id, error = %e, "classification failed; run aborted");
                            return Err(e);
                        }
                        ErrorPolicy::SkipSilently => {
                            skipped += 1;
                            debug!(target: "pipeline", %id, error = %e, "classification failed; skipped");
                        }
                        ErrorPolicy::SkipAndReport => {
                            warn!(target: "pipeline", %id, kind = e.kind(), error = %e, "classification failed; skipped");
                            failures.push(ArticleFailure::new(article, &e));
                        }
                    }
                }
            }
        }

        let report = aggregate::collect(results);
        counter!("pipeline_classified_total").increment(report.len() as u64);
        info!(
            target: "pipeline",
            total = articles.len(),
            classified = report.len(),
            discarded,
            failed = failures.len(),
            skipped_silently = skipped,
            "run finished"
        );

        Ok(RunOutcome { report, failures })
    }
}
