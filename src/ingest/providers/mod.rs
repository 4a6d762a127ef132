// src/ingest/providers/mod.rs
pub mod newsapi;
pub mod static_source;

pub use newsapi::NewsApiSource;
pub use static_source::StaticSource;
