// src/config/taxonomy.rs
//! The fixed set of category labels the classifier must choose from.

use serde::{Deserialize, Serialize};

/// Labels used when no taxonomy is configured.
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Implementação de IA em escritórios de advocacia e tribunais brasileiros",
    "Novas legislações e regulamentações sobre IA no direito brasileiro",
    "Casos de uso bem-sucedidos de IA por advogados no Brasil",
    "Controvérsias ou uso inadequado de IA por profissionais jurídicos brasileiros",
    "Desafios éticos da IA na prática jurídica no contexto do Brasil",
    "Tendências emergentes que advogados brasileiros precisam conhecer",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Taxonomy {
    labels: Vec<String>,
}

impl Taxonomy {
    /// Trims labels, drops blanks and case-insensitive duplicates (first wins).
    /// An empty result is rejected.
    pub fn new<I, S>(labels: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for l in labels {
            let t = l.as_ref().trim();
            if t.is_empty() {
                continue;
            }
            let folded = t.to_lowercase();
            if out.iter().any(|seen| seen.to_lowercase() == folded) {
                continue;
            }
            out.push(t.to_string());
        }
        if out.is_empty() {
            return Err("taxonomy must contain at least one category".to_string());
        }
        Ok(Self { labels: out })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Canonical label matching `candidate` (trimmed, case-insensitive), if any.
    pub fn resolve(&self, candidate: &str) -> Option<&str> {
        let folded = candidate.trim().to_lowercase();
        if folded.is_empty() {
            return None;
        }
        self.labels
            .iter()
            .find(|l| l.to_lowercase() == folded)
            .map(String::as_str)
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            labels: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for Taxonomy {
    type Error = String;

    fn try_from(v: Vec<String>) -> Result<Self, Self::Error> {
        Taxonomy::new(v)
    }
}

impl From<Taxonomy> for Vec<String> {
    fn from(t: Taxonomy) -> Self {
        t.labels
    }
}
