//! AI adapter: generation provider abstraction + Gemini / OpenAI / mock providers.
//! A provider turns one prompt into the model's raw text; parsing happens elsewhere.

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{AiProviderKind, AppConfig};
use crate::error::{PipelineError, Result};

// ------------------------------------------------------------
// Public surface
// ------------------------------------------------------------

pub type ProviderFuture<'a> = Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

/// Low-level provider: does one remote generation call and returns the raw reply text.
/// Failing to reach the service, or a non-success answer, is `RemoteCall`.
pub trait Provider: Send + Sync {
    fn generate<'a>(&'a self, prompt: &'a str) -> ProviderFuture<'a>;
    /// Provider name for diagnostics/logs.
    fn name(&self) -> &'static str;
}

/// Convenient alias used by callers.
pub type DynProvider = Arc<dyn Provider>;

/// Factory: build the configured provider. Credentials must already be resolved.
pub fn build_provider(config: &AppConfig) -> Result<DynProvider> {
    let timeout = config.remote_timeout();
    match config.ai.provider {
        AiProviderKind::Gemini => Ok(Arc::new(GeminiProvider::new(
            config.ai.endpoint(),
            config.ai.model(),
            config.ai_key(),
            timeout,
        )?)),
        AiProviderKind::OpenAi => Ok(Arc::new(OpenAiProvider::new(
            config.ai.endpoint(),
            config.ai.model(),
            config.ai_key(),
            timeout,
        )?)),
    }
}

fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("legal-ai-news/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(timeout.min(Duration::from_secs(5)))
        .timeout(timeout)
        .build()
        .map_err(|e| PipelineError::Configuration(format!("http client: {e}")))
}

fn require_key(api_key: &str, provider: &str) -> Result<String> {
    let k = api_key.trim();
    if k.is_empty() {
        return Err(PipelineError::Configuration(format!(
            "{provider} API key is required"
        )));
    }
    Ok(k.to_string())
}

/// Error text from a non-2xx body. Both Gemini and OpenAI use `{"error":{"message":..}}`.
fn remote_error_message(status: reqwest::StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrBody {
        error: ErrDetail,
    }
    #[derive(Deserialize)]
    struct ErrDetail {
        message: String,
    }
    match serde_json::from_str::<ErrBody>(body) {
        Ok(b) => format!("HTTP {}: {}", status.as_u16(), b.error.message),
        Err(_) => {
            let snippet: String = body.chars().take(200).collect();
            format!("HTTP {}: {}", status.as_u16(), snippet.trim())
        }
    }
}

// ------------------------------------------------------------
// Gemini
// ------------------------------------------------------------

pub const GEMINI_KEY_HEADER: &str = "x-goog-api-key";

/// Google Gemini `generateContent`. Key travels in the `x-goog-api-key` header, never in the URL.
pub struct GeminiProvider {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl GeminiProvider {
    pub fn new(endpoint: &str, model: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: http_client(timeout)?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: require_key(api_key, "Gemini")?,
        })
    }
}

impl Provider for GeminiProvider {
    fn generate<'a>(&'a self, prompt: &'a str) -> ProviderFuture<'a> {
        Box::pin(async move {
            #[derive(Serialize)]
            struct Part<'a> {
                text: &'a str,
            }
            #[derive(Serialize)]
            struct Content<'a> {
                role: &'a str,
                parts: Vec<Part<'a>>,
            }
            #[derive(Serialize)]
            #[serde(rename_all = "camelCase")]
            struct GenerationConfig {
                temperature: f32,
                response_mime_type: &'static str,
            }
            #[derive(Serialize)]
            #[serde(rename_all = "camelCase")]
            struct Req<'a> {
                contents: Vec<Content<'a>>,
                generation_config: GenerationConfig,
            }
            #[derive(Deserialize)]
            struct Resp {
                #[serde(default)]
                candidates: Vec<Candidate>,
            }
            #[derive(Deserialize)]
            struct Candidate {
                content: Option<RespContent>,
            }
            #[derive(Deserialize)]
            struct RespContent {
                #[serde(default)]
                parts: Vec<RespPart>,
            }
            #[derive(Deserialize)]
            struct RespPart {
                text: Option<String>,
            }

            let req = Req {
                contents: vec![Content {
                    role: "user",
                    parts: vec![Part { text: prompt }],
                }],
                generation_config: GenerationConfig {
                    temperature: 0.2,
                    response_mime_type: "application/json",
                },
            };

            let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
            let resp = self
                .http
                .post(url)
                .header(GEMINI_KEY_HEADER, &self.api_key)
                .json(&req)
                .send()
                .await
                .map_err(|e| PipelineError::RemoteCall(format!("gemini request: {}", e.without_url())))?;

            let status = resp.status();
            let body = resp
                .text()
                .await
                .map_err(|e| PipelineError::RemoteCall(format!("gemini response: {}", e.without_url())))?;
            if !status.is_success() {
                return Err(PipelineError::RemoteCall(remote_error_message(status, &body)));
            }

            let parsed: Resp = serde_json::from_str(&body)
                .map_err(|e| PipelineError::RemoteCall(format!("gemini response body: {e}")))?;
            // No candidate (e.g. safety block) yields an empty reply; the parser reports it.
            let text = parsed
                .candidates
                .into_iter()
                .next()
                .and_then(|c| c.content)
                .map(|c| {
                    c.parts
                        .into_iter()
                        .filter_map(|p| p.text)
                        .collect::<Vec<_>>()
                        .join("")
                })
                .unwrap_or_default();
            Ok(text)
        })
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

// ------------------------------------------------------------
// OpenAI
// ------------------------------------------------------------

/// OpenAI provider (uses Chat Completions API).
pub struct OpenAiProvider {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(endpoint: &str, model: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: http_client(timeout)?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: require_key(api_key, "OpenAI")?,
        })
    }
}

impl Provider for OpenAiProvider {
    fn generate<'a>(&'a self, prompt: &'a str) -> ProviderFuture<'a> {
        Box::pin(async move {
            #[derive(Serialize)]
            struct Msg<'a> {
                role: &'a str,
                content: &'a str,
            }
            #[derive(Serialize)]
            struct Req<'a> {
                model: &'a str,
                messages: Vec<Msg<'a>>,
                temperature: f32,
            }
            #[derive(Deserialize)]
            struct Resp {
                choices: Vec<Choice>,
            }
            #[derive(Deserialize)]
            struct Choice {
                message: ChoiceMsg,
            }
            #[derive(Deserialize)]
            struct ChoiceMsg {
                #[serde(default)]
                content: Option<String>,
            }

            let sys = "Você é um analista de notícias jurídicas. Responda somente com um objeto JSON.";
            let req = Req {
                model: &self.model,
                messages: vec![
                    Msg {
                        role: "system",
                        content: sys,
                    },
                    Msg {
                        role: "user",
                        content: prompt,
                    },
                ],
                temperature: 0.2,
            };

            let resp = self
                .http
                .post(format!("{}/chat/completions", self.endpoint))
                .bearer_auth(&self.api_key)
                .json(&req)
                .send()
                .await
                .map_err(|e| PipelineError::RemoteCall(format!("openai request: {}", e.without_url())))?;

            let status = resp.status();
            let body = resp
                .text()
                .await
                .map_err(|e| PipelineError::RemoteCall(format!("openai response: {}", e.without_url())))?;
            if !status.is_success() {
                return Err(PipelineError::RemoteCall(remote_error_message(status, &body)));
            }
            let parsed: Resp = serde_json::from_str(&body)
                .map_err(|e| PipelineError::RemoteCall(format!("openai response body: {e}")))?;
            Ok(parsed
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .unwrap_or_default())
        })
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

// ------------------------------------------------------------
// Mock
// ------------------------------------------------------------

/// Scripted provider for tests/local runs.
///
/// Replies are handed out in order; once the script runs out the `fallback`
/// reply (if any) repeats, otherwise calls fail with `RemoteCall`.
pub struct MockProvider {
    script: Mutex<VecDeque<Result<String>>>,
    fallback: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockProvider {
    /// Always answers `reply`.
    pub fn fixed(reply: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(reply.into()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Answers each entry once, in order.
    pub fn scripted(replies: Vec<Result<String>>) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            fallback: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleep before answering (to exercise timeouts).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `generate` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_reply(&self) -> Result<String> {
        let next = match self.script.lock() {
            Ok(mut g) => g.pop_front(),
            Err(poison) => poison.into_inner().pop_front(),
        };
        match (next, &self.fallback) {
            (Some(r), _) => r,
            (None, Some(f)) => Ok(f.clone()),
            (None, None) => Err(PipelineError::RemoteCall("mock script exhausted".to_string())),
        }
    }
}

impl Provider for MockProvider {
    fn generate<'a>(&'a self, _prompt: &'a str) -> ProviderFuture<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            if let Some(d) = self.delay {
                tokio::time::sleep(d).await;
            }
            self.next_reply()
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
