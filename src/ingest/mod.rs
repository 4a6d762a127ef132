// src/ingest/mod.rs
pub mod providers;
pub mod types;

pub use types::{ArticleSource, QuerySpec, RawArticle, MAX_PAGE_SIZE};

use once_cell::sync::OnceCell;
use regex::Regex;

/// Longest text we forward to the prompt, in chars.
pub const MAX_TEXT_CHARS: usize = 2000;

/// Normalize fetched text: decode entities, strip tags, collapse whitespace, cap length.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Drop the "[+1234 chars]" truncation marker search APIs append to bodies
    static RE_TRUNC: OnceCell<Regex> = OnceCell::new();
    let re_trunc =
        RE_TRUNC.get_or_init(|| Regex::new(r"\s*\[\+\d+ chars\]\s*$").expect("trunc regex"));
    out = re_trunc.replace(&out, "").to_string();

    // 4) Collapse whitespace
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("ws regex"));
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 5) Length cap
    if out.chars().count() > MAX_TEXT_CHARS {
        out = out.chars().take(MAX_TEXT_CHARS).collect();
    }

    out
}

/// Short, stable id for an article (first 6 bytes of SHA-256 over the URL, hex).
/// Logs carry this instead of the raw link.
pub fn article_id(url: &str) -> String {
    use sha2::{Digest, Sha256};
    use std::fmt::Write as _;

    let digest = Sha256::digest(url.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_text_strips_markup_and_marker() {
        let s = "  <p>IA&nbsp;no &quot;Judiciário&quot;</p>\n\n avança… [+2311 chars]";
        assert_eq!(normalize_text(s), "IA no \"Judiciário\" avança…");
    }

    #[test]
    fn normalize_text_caps_length_on_char_boundary() {
        let s = "ç".repeat(MAX_TEXT_CHARS + 50);
        let out = normalize_text(&s);
        assert_eq!(out.chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn article_id_is_stable_and_short() {
        let a = article_id("https://example.com/noticia1");
        assert_eq!(a.len(), 12);
        assert_eq!(a, article_id("https://example.com/noticia1"));
        assert_ne!(a, article_id("https://example.com/noticia2"));
    }
}
