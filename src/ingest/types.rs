// src/ingest/types.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Hard cap on articles per run; the search is never paginated past one page.
pub const MAX_PAGE_SIZE: u8 = 10;

/// Sort key sent to the search service.
pub const SORT_BY_RELEVANCE: &str = "relevancy";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawArticle {
    pub published_at: DateTime<Utc>,
    pub title: String,
    pub source: String, // publisher name, e.g. "Conjur"
    pub url: String,
    pub description: Option<String>,
    pub content: Option<String>,
}

impl RawArticle {
    /// Publication date as shown to users (`dd/mm/yyyy`).
    pub fn publication_date(&self) -> String {
        self.published_at.format("%d/%m/%Y").to_string()
    }

    /// Best available text: description and body joined, or empty.
    pub fn text(&self) -> String {
        let parts: Vec<&str> = [self.description.as_deref(), self.content.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        parts.join("\n")
    }
}

/// What to ask the search service for. Built once from config; the from-date is
/// resolved against the clock at fetch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub query: String,
    pub language: String,
    pub sort_by: String,
    pub lookback_days: u32,
    pub page_size: u8,
}

impl QuerySpec {
    pub fn new(query: impl Into<String>, language: impl Into<String>, lookback_days: u32, page_size: u8) -> Self {
        Self {
            query: query.into(),
            language: language.into(),
            sort_by: SORT_BY_RELEVANCE.to_string(),
            lookback_days: lookback_days.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn from_date(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(i64::from(self.lookback_days))
    }
}

#[async_trait::async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch(&self, query: &QuerySpec) -> Result<Vec<RawArticle>>;
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn page_size_is_clamped_to_one_page() {
        assert_eq!(QuerySpec::new("q", "pt", 10, 50).page_size, MAX_PAGE_SIZE);
        assert_eq!(QuerySpec::new("q", "pt", 10, 0).page_size, 1);
        assert_eq!(QuerySpec::new("q", "pt", 0, 5).lookback_days, 1);
    }

    #[test]
    fn from_date_is_now_minus_lookback() {
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap();
        let q = QuerySpec::new("q", "pt", 10, 10);
        assert_eq!(q.from_date(now), Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap());
    }

    #[test]
    fn text_joins_description_and_body() {
        let a = RawArticle {
            published_at: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            title: "t".into(),
            source: "s".into(),
            url: "u".into(),
            description: Some(" resumo ".into()),
            content: Some("corpo".into()),
        };
        assert_eq!(a.text(), "resumo\ncorpo");
        assert_eq!(a.publication_date(), "02/01/2024");
    }
}
