// src/report/mod.rs
//! Presentation of an [`AggregatedReport`](crate::aggregate::AggregatedReport): CSV and HTML.

pub mod csv_export;
pub mod markup;

pub use csv_export::{from_csv, to_csv, CSV_FILE_NAME, CSV_HEADERS};
pub use markup::render_html;
