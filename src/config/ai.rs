// src/config/ai.rs
use std::fmt;

use serde::{Deserialize, Serialize};

pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProviderKind {
    #[default]
    Gemini,
    OpenAi,
}

impl AiProviderKind {
    pub fn key_env_var(self) -> &'static str {
        match self {
            AiProviderKind::Gemini => ENV_GEMINI_API_KEY,
            AiProviderKind::OpenAi => ENV_OPENAI_API_KEY,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AiProviderKind::Gemini => "gemini",
            AiProviderKind::OpenAi => "openai",
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AiConfig {
    pub provider: AiProviderKind,
    /// Missing or "ENV" means: read from GEMINI_API_KEY / OPENAI_API_KEY (by provider).
    pub api_key: Option<String>,
    /// Overrides the provider's default model.
    pub model: Option<String>,
    /// Overrides the provider's default base URL.
    pub endpoint: Option<String>,
}

impl AiConfig {
    pub fn model(&self) -> &str {
        match (&self.model, self.provider) {
            (Some(m), _) if !m.trim().is_empty() => m.trim(),
            (_, AiProviderKind::Gemini) => DEFAULT_GEMINI_MODEL,
            (_, AiProviderKind::OpenAi) => DEFAULT_OPENAI_MODEL,
        }
    }

    pub fn endpoint(&self) -> &str {
        match (&self.endpoint, self.provider) {
            (Some(e), _) if !e.trim().is_empty() => e.trim().trim_end_matches('/'),
            (_, AiProviderKind::Gemini) => DEFAULT_GEMINI_ENDPOINT,
            (_, AiProviderKind::OpenAi) => DEFAULT_OPENAI_ENDPOINT,
        }
    }
}

impl fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
