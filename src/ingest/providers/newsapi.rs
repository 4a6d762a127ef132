// src/ingest/providers/newsapi.rs
//! NewsAPI `/v2/everything` search. One page, no retry: any failure aborts the run.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::error::{PipelineError, Result};
use crate::ingest::normalize_text;
use crate::ingest::types::{ArticleSource, QuerySpec, RawArticle};

pub const DEFAULT_NEWSAPI_ENDPOINT: &str = "https://newsapi.org/v2/everything";

const UNKNOWN_SOURCE: &str = "Fonte desconhecida";
const REMOVED_MARKER: &str = "[Removed]";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    status: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<ApiArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiArticle {
    #[serde(default)]
    source: ApiSourceRef,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiSourceRef {
    name: Option<String>,
}

pub struct NewsApiSource {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl fmt::Debug for NewsApiSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiSource")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl NewsApiSource {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(PipelineError::Configuration(
                "news search API key is empty".to_string(),
            ));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("legal-ai-news/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .timeout(timeout)
            .build()
            .map_err(|e| PipelineError::Configuration(format!("http client: {e}")))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key,
        })
    }
}

#[async_trait]
impl ArticleSource for NewsApiSource {
    async fn fetch(&self, query: &QuerySpec) -> Result<Vec<RawArticle>> {
        let t0 = std::time::Instant::now();
        let from = query.from_date(Utc::now()).format("%Y-%m-%d").to_string();
        let page_size = query.page_size.to_string();

        let resp = self
            .http
            .get(&self.endpoint)
            .header("X-Api-Key", &self.api_key)
            .query(&[
                ("q", query.query.as_str()),
                ("from", from.as_str()),
                ("sortBy", query.sort_by.as_str()),
                ("language", query.language.as_str()),
                ("pageSize", page_size.as_str()),
                ("page", "1"),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(target: "ingest", error = %e, provider = "newsapi", "search request failed");
                counter!("source_errors_total").increment(1);
                PipelineError::SourceUnavailable(format!("search request failed: {e}"))
            })?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| {
            counter!("source_errors_total").increment(1);
            PipelineError::SourceUnavailable(format!("reading search response: {e}"))
        })?;

        let out = parse_search_response(status, &body, query.page_size);
        if out.is_err() {
            counter!("source_errors_total").increment(1);
        }
        histogram!("search_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        out
    }

    fn name(&self) -> &'static str {
        "newsapi"
    }
}

/// Map a raw search response (HTTP status + body) to articles.
/// Non-2xx or `status != "ok"` is `SourceUnavailable` carrying the service's own message.
pub fn parse_search_response(http_status: u16, body: &str, page_size: u8) -> Result<Vec<RawArticle>> {
    let parsed: SearchResponse = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) if (200..300).contains(&http_status) => {
            return Err(PipelineError::SourceUnavailable(format!(
                "malformed search response: {e}"
            )));
        }
        Err(_) => {
            let snippet: String = body.chars().take(200).collect();
            return Err(PipelineError::SourceUnavailable(format!(
                "HTTP {http_status}: {}",
                snippet.trim()
            )));
        }
    };

    if !(200..300).contains(&http_status) || parsed.status != "ok" {
        let msg = match (parsed.code.as_deref(), parsed.message.as_deref()) {
            (Some(code), Some(message)) => format!("{code}: {message}"),
            (None, Some(message)) => message.to_string(),
            (Some(code), None) => code.to_string(),
            (None, None) => format!("HTTP {http_status}, status '{}'", parsed.status),
        };
        return Err(PipelineError::SourceUnavailable(msg));
    }

    let mut out = Vec::with_capacity(parsed.articles.len().min(usize::from(page_size)));
    for it in parsed.articles {
        let (Some(title), Some(url)) = (it.title, it.url) else {
            continue;
        };
        let title = normalize_text(&title);
        if title.is_empty() || title == REMOVED_MARKER || url.trim().is_empty() {
            continue;
        }

        let Some(published_at) = it.published_at.as_deref().and_then(parse_timestamp) else {
            tracing::warn!(target: "ingest", url = %crate::ingest::article_id(&url), "article without usable publishedAt; skipped");
            continue;
        };

        let source = it
            .source
            .name
            .map(|s| normalize_text(&s))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN_SOURCE.to_string());

        out.push(RawArticle {
            published_at,
            title,
            source,
            url: url.trim().to_string(),
            description: it.description.map(|s| normalize_text(&s)).filter(|s| !s.is_empty()),
            content: it.content.map(|s| normalize_text(&s)).filter(|s| !s.is_empty()),
        });

        if out.len() >= usize::from(page_size) {
            break;
        }
    }

    counter!("ingest_events_total").increment(out.len() as u64);
    Ok(out)
}

fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
