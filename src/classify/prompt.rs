// src/classify/prompt.rs
use std::fmt::Write as _;

use crate::classify::reply::DISCARD_KEY;
use crate::config::Taxonomy;
use crate::ingest::RawArticle;

/// Build the classification prompt for one article. Pure: same inputs, same prompt.
pub fn build_prompt(article: &RawArticle, taxonomy: &Taxonomy) -> String {
    let text = article.text();
    let text = if text.is_empty() {
        "(texto indisponível)".to_string()
    } else {
        text
    };

    let mut categories = String::new();
    for label in taxonomy.labels() {
        let _ = writeln!(categories, "    - {label}");
    }

    format!(
        r#"Analise a seguinte notícia e decida se ela trata de inteligência artificial no setor jurídico brasileiro.

Título: {title}
Fonte: {source}
Link: {link}
Data de publicação: {date}
Texto: {text}

Se a notícia NÃO tratar de inteligência artificial no contexto jurídico brasileiro, responda apenas:
{{"{discard}": "motivo curto"}}

Caso contrário, forneça:
1. Um resumo conciso da notícia em no máximo 2 linhas.
2. A categoria principal da notícia, escolhendo exatamente UMA das opções abaixo (copie o texto da opção):
{categories}
Formato da resposta: um único objeto JSON, sem texto adicional:
{{
  "date": "dd/mm/aaaa",
  "title": "título da notícia",
  "source": "nome da fonte",
  "link": "URL da notícia",
  "category": "uma das categorias acima",
  "summary": "resumo em até 2 linhas"
}}"#,
        title = article.title,
        source = article.source,
        link = article.url,
        date = article.publication_date(),
        text = text,
        discard = DISCARD_KEY,
        categories = categories,
    )
}
