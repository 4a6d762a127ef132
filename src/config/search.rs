// src/config/search.rs
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ingest::providers::newsapi::DEFAULT_NEWSAPI_ENDPOINT;
use crate::ingest::{QuerySpec, MAX_PAGE_SIZE};

pub const ENV_NEWSAPI_KEY: &str = "NEWSAPI_KEY";

pub const DEFAULT_QUERY: &str = r#"("inteligência artificial" OR "IA") AND (jurídico OR advocacia OR advogados OR tribunal OR judiciário OR direito)"#;
pub const DEFAULT_LANGUAGE: &str = "pt";
pub const DEFAULT_LOOKBACK_DAYS: u32 = 10;

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Missing or "ENV" means: read from NEWSAPI_KEY.
    pub api_key: Option<String>,
    pub endpoint: String,
    pub query: String,
    pub language: String,
    pub lookback_days: u32,
    pub page_size: u8,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_NEWSAPI_ENDPOINT.to_string(),
            query: DEFAULT_QUERY.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            page_size: MAX_PAGE_SIZE,
        }
    }
}

impl SearchConfig {
    pub fn query_spec(&self) -> QuerySpec {
        QuerySpec::new(
            self.query.clone(),
            self.language.clone(),
            self.lookback_days,
            self.page_size,
        )
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("query", &self.query)
            .field("language", &self.language)
            .field("lookback_days", &self.lookback_days)
            .field("page_size", &self.page_size)
            .finish()
    }
}
