// src/report/markup.rs
//! Inline HTML rendering of a report (self-contained, inline styles).

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::aggregate::AggregatedReport;

const TABLE_STYLE: &str = "border-collapse:collapse;width:100%;font-family:sans-serif;font-size:14px";
const CELL_STYLE: &str = "border:1px solid #ddd;padding:6px;vertical-align:top";
const HEAD_STYLE: &str = "border:1px solid #ddd;padding:6px;background:#1f3a5f;color:#fff;text-align:left";

pub fn render_html(report: &AggregatedReport) -> String {
    if report.is_empty() {
        return r#"<p class="noticias-vazio">Nenhuma notícia relevante encontrada.</p>"#.to_string();
    }

    let mut out = String::with_capacity(512 + report.len() * 512);
    let _ = write!(out, r#"<table class="noticias" style="{TABLE_STYLE}">"#);
    out.push_str("<thead><tr>");
    for h in ["Data", "Título", "Fonte", "Categoria", "Resumo"] {
        let _ = write!(out, r#"<th style="{HEAD_STYLE}">{h}</th>"#);
    }
    out.push_str("</tr></thead><tbody>");

    for rec in report {
        out.push_str("<tr>");
        cell(&mut out, &encode_text(&rec.publication_date));
        cell(&mut out, &title_cell(&rec.title, &rec.link));
        cell(&mut out, &encode_text(&rec.source));
        cell(&mut out, &encode_text(&rec.category));
        cell(&mut out, &encode_text(&rec.summary));
        out.push_str("</tr>");
    }

    out.push_str("</tbody></table>");
    out
}

fn cell(out: &mut String, html: &str) {
    let _ = write!(out, r#"<td style="{CELL_STYLE}">{html}</td>"#);
}

/// Title as an anchor when the link is http(s); plain text otherwise.
fn title_cell(title: &str, link: &str) -> String {
    let lower = link.trim().to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
            encode_double_quoted_attribute(link.trim()),
            encode_text(title)
        )
    } else {
        encode_text(title).into_owned()
    }
}
