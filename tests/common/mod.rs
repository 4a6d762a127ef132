// tests/common/mod.rs
// Shared builders for integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use legal_ai_news::classify::MockProvider;
use legal_ai_news::config::Taxonomy;
use legal_ai_news::error::{PipelineError, Result};
use legal_ai_news::ingest::providers::StaticSource;
use legal_ai_news::ingest::{ArticleSource, QuerySpec, RawArticle};
use legal_ai_news::{ErrorPolicy, Pipeline, RelevanceClassifier};

pub fn article(n: u32, title: &str) -> RawArticle {
    RawArticle {
        published_at: Utc.with_ymd_and_hms(2024, 5, n.clamp(1, 28), 9, 30, 0).unwrap(),
        title: title.to_string(),
        source: "Conjur".to_string(),
        url: format!("https://noticias.example/{n}"),
        description: Some(format!("Descrição da notícia {n}.")),
        content: None,
    }
}

pub fn category(i: usize) -> String {
    Taxonomy::default().labels()[i].clone()
}

/// A well-formed, fenced model reply for `a`.
pub fn classified_reply(a: &RawArticle, category: &str, summary: &str) -> String {
    let body = serde_json::json!({
        "date": a.publication_date(),
        "title": a.title,
        "source": a.source,
        "link": a.url,
        "category": category,
        "summary": summary,
    });
    format!("```json\n{body:#}\n```")
}

pub fn discard_reply() -> String {
    r#"{"discard": "não trata de IA no setor jurídico"}"#.to_string()
}

/// Source that always fails the way an unreachable search service does.
pub struct FailingSource(pub String);

#[async_trait]
impl ArticleSource for FailingSource {
    async fn fetch(&self, _query: &QuerySpec) -> Result<Vec<RawArticle>> {
        Err(PipelineError::SourceUnavailable(self.0.clone()))
    }
    fn name(&self) -> &'static str {
        "failing"
    }
}

pub fn query() -> QuerySpec {
    QuerySpec::new("inteligência artificial", "pt", 10, 10)
}

pub fn pipeline_with(
    source: Box<dyn ArticleSource>,
    provider: Arc<MockProvider>,
    policy: ErrorPolicy,
) -> Pipeline {
    let classifier = RelevanceClassifier::new(provider, Taxonomy::default(), Duration::from_secs(2));
    Pipeline::new(source, query(), classifier, policy, Duration::from_secs(2))
}

pub fn static_pipeline(
    articles: Vec<RawArticle>,
    replies: Vec<Result<String>>,
    policy: ErrorPolicy,
) -> (Pipeline, Arc<MockProvider>) {
    let provider = Arc::new(MockProvider::scripted(replies));
    let p = pipeline_with(
        Box::new(StaticSource::manual(articles)),
        provider.clone(),
        policy,
    );
    (p, provider)
}
