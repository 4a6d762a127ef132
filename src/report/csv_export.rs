// src/report/csv_export.rs
use anyhow::{Context, Result};

use crate::aggregate::AggregatedReport;
use crate::classify::ClassifiedArticle;

/// Download name used by the HTTP endpoint and the CLI default.
pub const CSV_FILE_NAME: &str = "noticias_processadas.csv";

pub const CSV_HEADERS: [&str; 6] = [
    "publication_date",
    "title",
    "source",
    "link",
    "category",
    "summary",
];

/// UTF-8, comma-delimited, standard quoting. The header row is written even for an
/// empty report.
pub fn to_csv(report: &AggregatedReport) -> Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    wtr.write_record(CSV_HEADERS).context("writing csv header")?;
    for rec in report {
        wtr.serialize(rec).context("writing csv row")?;
    }
    wtr.into_inner().context("flushing csv")
}

/// Parse an export produced by [`to_csv`].
pub fn from_csv(bytes: &[u8]) -> Result<AggregatedReport> {
    let mut rdr = csv::Reader::from_reader(bytes);
    let headers = rdr.headers().context("reading csv header")?.clone();
    if headers.iter().ne(CSV_HEADERS.iter().copied()) {
        anyhow::bail!("unexpected csv header: {:?}", headers);
    }
    let mut out = Vec::new();
    for row in rdr.deserialize::<ClassifiedArticle>() {
        out.push(row.context("reading csv row")?);
    }
    Ok(AggregatedReport::from_records(out))
}
