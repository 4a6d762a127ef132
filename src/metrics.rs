use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder. Call once, from the binary.
    pub fn init() -> anyhow::Result<Self> {
        // Use default buckets to avoid API differences across crate versions.
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))?;
        describe_metrics();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// One-time metrics registration (so series show up on /metrics).
pub fn describe_metrics() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("pipeline_runs_total", "Curation runs started.");
        describe_counter!("pipeline_articles_total", "Articles sent to classification.");
        describe_counter!("pipeline_classified_total", "Articles kept in the report.");
        describe_counter!("pipeline_discarded_total", "Articles judged out of domain.");
        describe_counter!(
            "pipeline_failures_total",
            "Per-article classification failures (any policy)."
        );
        describe_counter!("source_errors_total", "News search failures.");
        describe_counter!("ingest_events_total", "Articles returned by the news search.");
        describe_histogram!("classify_ms", "Generation call latency in milliseconds.");
        describe_histogram!("search_ms", "News search latency in milliseconds.");
    });
}
