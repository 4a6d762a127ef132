// src/error.rs
//! Error taxonomy for one curation run.
//!
//! `Configuration` and `SourceUnavailable` always abort a run. The per-article
//! variants (`RemoteCall`, `Parse`, `Validation`) are routed through the
//! configured [`ErrorPolicy`](crate::pipeline::ErrorPolicy).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("news source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("generation call failed: {0}")]
    RemoteCall(String),

    #[error("unparseable generation reply: {0}")]
    Parse(String),

    #[error("invalid generation reply: {0}")]
    Validation(String),
}

impl PipelineError {
    /// True for errors that concern a single article rather than the whole run.
    pub fn is_per_article(&self) -> bool {
        matches!(
            self,
            PipelineError::RemoteCall(_) | PipelineError::Parse(_) | PipelineError::Validation(_)
        )
    }

    /// Short machine-friendly label used in failure summaries and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Configuration(_) => "configuration",
            PipelineError::SourceUnavailable(_) => "source_unavailable",
            PipelineError::RemoteCall(_) => "remote_call",
            PipelineError::Parse(_) => "parse",
            PipelineError::Validation(_) => "validation",
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_article_split() {
        assert!(PipelineError::Parse("x".into()).is_per_article());
        assert!(PipelineError::Validation("x".into()).is_per_article());
        assert!(PipelineError::RemoteCall("x".into()).is_per_article());
        assert!(!PipelineError::SourceUnavailable("x".into()).is_per_article());
        assert!(!PipelineError::Configuration("x".into()).is_per_article());
    }

    #[test]
    fn display_keeps_raw_message() {
        let e = PipelineError::SourceUnavailable("apiKeyInvalid: Your API key is invalid".into());
        assert_eq!(
            e.to_string(),
            "news source unavailable: apiKeyInvalid: Your API key is invalid"
        );
        assert_eq!(e.kind(), "source_unavailable");
    }
}
