// tests/report_csv.rs
//
// CSV export read back by a standard reader: same rows, same order, same fields.

use legal_ai_news::report::{from_csv, to_csv, CSV_HEADERS};
use legal_ai_news::{AggregatedReport, ClassifiedArticle};

fn record(i: usize) -> ClassifiedArticle {
    ClassifiedArticle {
        publication_date: format!("{:02}/05/2024", i + 1),
        title: format!("Notícia {i}: \"IA\", tribunais e ética"),
        source: if i % 2 == 0 { "Conjur".into() } else { "Migalhas, Brasil".into() },
        link: format!("https://noticias.example/{i}?a=1&b=2"),
        category: "Ética e regulamentação".into(),
        summary: format!("Resumo {i}; com vírgula, aspas \"duplas\" e acentuação ç ã é."),
    }
}

#[test]
fn export_reads_back_identically() {
    let records: Vec<ClassifiedArticle> = (0..7).map(record).collect();
    let report = AggregatedReport::from_records(records.clone());

    let bytes = to_csv(&report).expect("export");
    let text = String::from_utf8(bytes.clone()).expect("utf-8");
    assert_eq!(text.lines().next(), Some(CSV_HEADERS.join(",").as_str()));

    // Plain csv reader, no knowledge of our types.
    let mut rdr = csv::Reader::from_reader(bytes.as_slice());
    let rows: Vec<csv::StringRecord> = rdr.records().collect::<Result<_, _>>().unwrap();
    assert_eq!(rows.len(), 7);
    assert_eq!(&rows[3][1], records[3].title.as_str());
    assert_eq!(&rows[3][2], "Migalhas, Brasil");
    assert_eq!(&rows[6][5], records[6].summary.as_str());

    let back = from_csv(&bytes).expect("import");
    assert_eq!(back, report);
}

#[test]
fn empty_export_reads_back_empty() {
    let bytes = to_csv(&AggregatedReport::default()).unwrap();
    let back = from_csv(&bytes).unwrap();
    assert!(back.is_empty());
}
