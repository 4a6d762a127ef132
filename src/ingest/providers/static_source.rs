// src/ingest/providers/static_source.rs
//! Fixed article lists: manual entries and the built-in simulated news.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::error::Result;
use crate::ingest::types::{ArticleSource, QuerySpec, RawArticle};

#[derive(Debug, Clone)]
pub struct StaticSource {
    label: &'static str,
    articles: Vec<RawArticle>,
}

impl StaticSource {
    /// Articles supplied by an operator (form or request body).
    pub fn manual(articles: Vec<RawArticle>) -> Self {
        Self {
            label: "manual",
            articles,
        }
    }

    /// Two sample articles, dated one and three days before `now`.
    pub fn simulated(now: DateTime<Utc>) -> Self {
        Self {
            label: "simulated",
            articles: simulated_articles(now),
        }
    }

    pub fn articles(&self) -> &[RawArticle] {
        &self.articles
    }
}

#[async_trait]
impl ArticleSource for StaticSource {
    /// Returns the list as given; the query does not apply to a fixed list.
    async fn fetch(&self, _query: &QuerySpec) -> Result<Vec<RawArticle>> {
        Ok(self.articles.clone())
    }

    fn name(&self) -> &'static str {
        self.label
    }
}

pub fn simulated_articles(now: DateTime<Utc>) -> Vec<RawArticle> {
    vec![
        RawArticle {
            published_at: now - Duration::days(1),
            title: "IA Generativa Revoluciona Análise de Contratos em Escritórios Brasileiros"
                .to_string(),
            source: "Portal Jurídico Tech".to_string(),
            url: "https://example.com/noticia1".to_string(),
            description: None,
            content: Some(
                "Grandes escritórios estão adotando IA Generativa para análise de contratos..."
                    .to_string(),
            ),
        },
        RawArticle {
            published_at: now - Duration::days(3),
            title: "CNJ Discute Nova Resolução sobre IA no Judiciário".to_string(),
            source: "Notícias do Judiciário".to_string(),
            url: "https://example.com/noticia2".to_string(),
            description: None,
            content: Some(
                "O CNJ debate resolução para IA em apoio a decisões judiciais...".to_string(),
            ),
        },
    ]
}
