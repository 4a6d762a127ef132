// src/aggregate.rs
//! Result aggregation: keep the classified articles, in arrival order.

use serde::{Deserialize, Serialize};

use crate::classify::{ClassificationResult, ClassifiedArticle};

/// Ordered curated articles of one run. No dedup, no sorting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregatedReport {
    records: Vec<ClassifiedArticle>,
}

impl AggregatedReport {
    pub fn from_records(records: Vec<ClassifiedArticle>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ClassifiedArticle] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ClassifiedArticle> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClassifiedArticle> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a AggregatedReport {
    type Item = &'a ClassifiedArticle;
    type IntoIter = std::slice::Iter<'a, ClassifiedArticle>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Drop `Discarded`, keep `Classified` in input order.
pub fn collect<I>(results: I) -> AggregatedReport
where
    I: IntoIterator<Item = ClassificationResult>,
{
    let records = results
        .into_iter()
        .filter_map(|r| match r {
            ClassificationResult::Classified(c) => Some(c),
            ClassificationResult::Discarded => None,
        })
        .collect();
    AggregatedReport { records }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(title: &str) -> ClassifiedArticle {
        ClassifiedArticle {
            publication_date: "01/01/2024".into(),
            title: title.into(),
            source: "s".into(),
            link: format!("https://e.x/{title}"),
            category: "c".into(),
            summary: "r".into(),
        }
    }

    #[test]
    fn keeps_order_and_drops_only_discarded() {
        let input = vec![
            ClassificationResult::Classified(rec("a")),
            ClassificationResult::Discarded,
            ClassificationResult::Classified(rec("b")),
            ClassificationResult::Discarded,
            ClassificationResult::Classified(rec("c")),
        ];
        let classified = input
            .iter()
            .filter(|r| matches!(r, ClassificationResult::Classified(_)))
            .count();
        let report = collect(input);
        assert_eq!(report.len(), classified);
        let titles: Vec<&str> = report.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["a", "b", "c"]);
    }

    #[test]
    fn duplicates_are_kept() {
        let report = collect(vec![
            ClassificationResult::Classified(rec("a")),
            ClassificationResult::Classified(rec("a")),
        ]);
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn all_discarded_is_empty() {
        assert!(collect(vec![ClassificationResult::Discarded; 3]).is_empty());
        assert!(collect(Vec::new()).is_empty());
    }

    #[test]
    fn serializes_as_flat_array() {
        let report = collect(vec![ClassificationResult::Classified(rec("a"))]);
        let v = serde_json::to_value(&report).unwrap();
        assert!(v.is_array());
        assert_eq!(v[0]["publication_date"], "01/01/2024");
        assert_eq!(v[0]["category"], "c");
    }
}
