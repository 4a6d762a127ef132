// src/classify/reply.rs
//! Strict parsing of the generation reply into a [`ClassificationResult`].

use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

use crate::classify::fence::strip_fence;
use crate::classify::{ClassificationResult, ClassifiedArticle};
use crate::config::Taxonomy;
use crate::error::{PipelineError, Result};
use crate::ingest::RawArticle;

/// Reserved key: its presence means "out of domain", whatever else the object holds.
pub const DISCARD_KEY: &str = "discard";

/// Summaries are meant to be about two lines.
pub const MAX_SUMMARY_CHARS: usize = 400;

/// Keys the model is asked for, each followed by its accepted Portuguese aliases.
/// The first present, non-null key wins; the rest are ignored.
const DATE_KEYS: &[&str] = &["date", "data"];
const TITLE_KEYS: &[&str] = &["title", "titulo", "título"];
const SOURCE_KEYS: &[&str] = &["source", "fonte"];
const LINK_KEYS: &[&str] = &["link"];
const CATEGORY_KEYS: &[&str] = &["category", "categoria"];
const SUMMARY_KEYS: &[&str] = &["summary", "resumo"];

pub fn parse_reply(
    reply: &str,
    article: &RawArticle,
    taxonomy: &Taxonomy,
) -> Result<ClassificationResult> {
    let body = strip_fence(reply);
    if body.is_empty() {
        return Err(PipelineError::Parse("empty reply".to_string()));
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| PipelineError::Parse(format!("invalid JSON: {e}")))?;
    let Value::Object(map) = value else {
        return Err(PipelineError::Parse("expected a JSON object".to_string()));
    };

    if let Some(reason) = map.get(DISCARD_KEY) {
        tracing::debug!(target: "classify", reason = %reason, "article discarded by model");
        return Ok(ClassificationResult::Discarded);
    }

    let date = required(&map, DATE_KEYS)?;
    let title = required(&map, TITLE_KEYS)?;
    let source = required(&map, SOURCE_KEYS)?;
    let link = required(&map, LINK_KEYS)?;
    let category_raw = required(&map, CATEGORY_KEYS)?;
    let summary = sanitize_summary(&required(&map, SUMMARY_KEYS)?);
    if summary.is_empty() {
        return Err(PipelineError::Parse("field 'summary' is empty".to_string()));
    }

    let category = taxonomy
        .resolve(&category_raw)
        .ok_or_else(|| {
            PipelineError::Validation(format!("category '{category_raw}' is not in the taxonomy"))
        })?
        .to_string();

    let publication_date = normalize_date(&date).unwrap_or_else(|| {
        tracing::debug!(target: "classify", reply_date = %date, "unrecognized date; using article date");
        article.publication_date()
    });

    Ok(ClassificationResult::Classified(ClassifiedArticle {
        publication_date,
        title,
        source,
        link,
        category,
        summary,
    }))
}

fn required(map: &Map<String, Value>, keys: &[&str]) -> Result<String> {
    let field = keys[0];
    match keys.iter().find_map(|k| map.get(*k).filter(|v| !v.is_null())) {
        None => Err(PipelineError::Parse(format!("missing field '{field}'"))),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(PipelineError::Parse(format!("field '{field}' is empty")))
        }
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(other) => Err(PipelineError::Parse(format!(
            "field '{field}' is not a string: {other}"
        ))),
    }
}

/// `dd/mm/yyyy`, `yyyy-mm-dd` and RFC 3339 timestamps become `dd/mm/yyyy`.
pub fn normalize_date(s: &str) -> Option<String> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%d/%m/%Y") {
        return Some(d.format("%d/%m/%Y").to_string());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.format("%d/%m/%Y").to_string());
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.date_naive().format("%d/%m/%Y").to_string())
}

/// Single line, collapsed whitespace, at most [`MAX_SUMMARY_CHARS`] chars.
/// An over-long summary is cut at the last word boundary before the cap.
pub fn sanitize_summary(input: &str) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    let total = collapsed.chars().count();
    if total <= MAX_SUMMARY_CHARS {
        return collapsed;
    }

    let head: String = collapsed.chars().take(MAX_SUMMARY_CHARS).collect();
    let cut = if collapsed.chars().nth(MAX_SUMMARY_CHARS) == Some(' ') {
        head.as_str()
    } else {
        head.rfind(' ').map_or(head.as_str(), |i| &head[..i])
    };
    let out = cut.trim_end().to_string();
    tracing::debug!(
        target: "classify",
        original_chars = total,
        kept_chars = out.chars().count(),
        "summary truncated"
    );
    out
}
