// src/config/mod.rs
//! Process-wide configuration, built once at startup and injected into the pipeline.

pub mod ai;
pub mod search;
pub mod taxonomy;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::pipeline::ErrorPolicy;

pub use ai::{AiConfig, AiProviderKind};
pub use search::SearchConfig;
pub use taxonomy::Taxonomy;

pub const ENV_CONFIG_PATH: &str = "CURATOR_CONFIG_PATH";
pub const DEFAULT_CONFIG_TOML: &str = "config/curator.toml";
pub const DEFAULT_CONFIG_JSON: &str = "config/curator.json";
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 30;

/// Sentinel meaning "take this credential from the environment".
const ENV_SENTINEL: &str = "env";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub on_error: ErrorPolicy,
    /// Upper bound for every remote call (search and generation).
    pub remote_timeout_secs: u64,
    pub taxonomy: Taxonomy,
    pub search: SearchConfig,
    pub ai: AiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            on_error: ErrorPolicy::default(),
            remote_timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
            taxonomy: Taxonomy::default(),
            search: SearchConfig::default(),
            ai: AiConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load using env var + fallbacks, then resolve credentials from the process env:
    /// 1) $CURATOR_CONFIG_PATH
    /// 2) config/curator.toml
    /// 3) config/curator.json
    /// 4) built-in defaults
    pub fn load() -> Result<Self> {
        let cfg = match std::env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    return Err(PipelineError::Configuration(format!(
                        "{ENV_CONFIG_PATH} points to non-existent path {}",
                        pb.display()
                    )));
                }
                Self::from_file(&pb)?
            }
            Err(_) => {
                let toml_p = Path::new(DEFAULT_CONFIG_TOML);
                let json_p = Path::new(DEFAULT_CONFIG_JSON);
                if toml_p.exists() {
                    Self::from_file(toml_p)?
                } else if json_p.exists() {
                    Self::from_file(json_p)?
                } else {
                    Self::default()
                }
            }
        };
        cfg.resolve_credentials(|k| std::env::var(k).ok())
    }

    /// Parse a TOML or JSON config file (by extension, TOML when unknown).
    /// Credentials are left unresolved.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Configuration(format!("reading config from {}: {e}", path.display()))
        })?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        Self::parse(&content, &ext)
    }

    pub fn parse(content: &str, hint_ext: &str) -> Result<Self> {
        if hint_ext == "json" {
            serde_json::from_str(content)
                .map_err(|e| PipelineError::Configuration(format!("invalid JSON config: {e}")))
        } else {
            toml::from_str(content)
                .map_err(|e| PipelineError::Configuration(format!("invalid TOML config: {e}")))
        }
    }

    /// Fill in both credentials. A key that is missing, blank or "ENV" is looked up
    /// through `lookup`; if still absent the whole config is rejected.
    pub fn resolve_credentials<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.search.api_key = Some(resolve_key(
            self.search.api_key.take(),
            search::ENV_NEWSAPI_KEY,
            &lookup,
        )?);
        let ai_var = self.ai.provider.key_env_var();
        self.ai.api_key = Some(resolve_key(self.ai.api_key.take(), ai_var, &lookup)?);
        Ok(self)
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs.max(1))
    }

    /// Credentials after [`resolve_credentials`](Self::resolve_credentials); empty otherwise.
    pub fn search_key(&self) -> &str {
        self.search.api_key.as_deref().unwrap_or_default()
    }

    pub fn ai_key(&self) -> &str {
        self.ai.api_key.as_deref().unwrap_or_default()
    }
}

fn resolve_key<F>(configured: Option<String>, env_var: &str, lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let configured = configured
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case(ENV_SENTINEL));
    if let Some(k) = configured {
        return Ok(k);
    }
    lookup(env_var)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| PipelineError::Configuration(format!("missing {env_var} env var")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let m: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| m.get(k).cloned()
    }

    #[test]
    fn defaults_need_both_keys_from_env() {
        let cfg = AppConfig::default()
            .resolve_credentials(env_of(&[("NEWSAPI_KEY", "n-1"), ("GEMINI_API_KEY", "g-1")]))
            .unwrap();
        assert_eq!(cfg.search_key(), "n-1");
        assert_eq!(cfg.ai_key(), "g-1");
        assert_eq!(cfg.on_error, ErrorPolicy::SkipAndReport);
    }

    #[test]
    fn missing_generation_key_is_fatal() {
        let err = AppConfig::default()
            .resolve_credentials(env_of(&[("NEWSAPI_KEY", "n-1")]))
            .unwrap_err();
        assert_eq!(
            err,
            PipelineError::Configuration("missing GEMINI_API_KEY env var".into())
        );
    }

    #[test]
    fn missing_search_key_is_fatal_even_if_blank() {
        let err = AppConfig::default()
            .resolve_credentials(env_of(&[("NEWSAPI_KEY", "  "), ("GEMINI_API_KEY", "g")]))
            .unwrap_err();
        assert!(err.to_string().contains("NEWSAPI_KEY"));
    }

    #[test]
    fn toml_overrides_and_env_sentinel() {
        let toml = r#"
on_error = "abort_run"
remote_timeout_secs = 0
taxonomy = ["Regulação", "Ética", "regulação"]

[search]
api_key = "ENV"
page_size = 40
lookback_days = 7

[ai]
provider = "openai"
api_key = "sk-inline"
"#;
        let cfg = AppConfig::parse(toml, "toml")
            .unwrap()
            .resolve_credentials(env_of(&[("NEWSAPI_KEY", "n-env")]))
            .unwrap();
        assert_eq!(cfg.on_error, ErrorPolicy::AbortRun);
        assert_eq!(cfg.remote_timeout(), Duration::from_secs(1));
        assert_eq!(cfg.taxonomy.len(), 2);
        assert_eq!(cfg.search_key(), "n-env");
        assert_eq!(cfg.ai_key(), "sk-inline");
        assert_eq!(cfg.ai.model(), ai::DEFAULT_OPENAI_MODEL);
        let q = cfg.search.query_spec();
        assert_eq!(q.page_size, 10);
        assert_eq!(q.lookback_days, 7);
        assert_eq!(q.language, "pt");
    }

    #[test]
    fn json_config_is_accepted() {
        let json = r#"{"on_error":"skip_silently","ai":{"provider":"gemini","model":"gemini-pro"}}"#;
        let cfg = AppConfig::parse(json, "json").unwrap();
        assert_eq!(cfg.on_error, ErrorPolicy::SkipSilently);
        assert_eq!(cfg.ai.model(), "gemini-pro");
    }

    #[test]
    fn empty_taxonomy_rejected_at_parse() {
        let err = AppConfig::parse("taxonomy = []", "toml").unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[test]
    fn debug_never_prints_keys() {
        let cfg = AppConfig::default()
            .resolve_credentials(env_of(&[("NEWSAPI_KEY", "n-secret"), ("GEMINI_API_KEY", "g-secret")]))
            .unwrap();
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("n-secret") && !dbg.contains("g-secret"), "{dbg}");
    }
}
