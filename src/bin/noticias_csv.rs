//! One-shot export: run the curation pipeline once and write the report as CSV
//! (optionally also as an HTML fragment).

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use legal_ai_news::ingest::providers::StaticSource;
use legal_ai_news::report::{render_html, to_csv, CSV_FILE_NAME};
use legal_ai_news::{AppConfig, ErrorPolicy, Pipeline};

#[derive(Parser, Debug)]
#[command(name = "noticias-csv", version, about = "Export curated AI/legal news to CSV")]
struct Cli {
    /// CSV output path
    #[arg(short, long, default_value = CSV_FILE_NAME)]
    output: PathBuf,

    /// Also write the report as an HTML fragment
    #[arg(long)]
    html: Option<PathBuf>,

    /// Classify the two built-in sample articles instead of searching
    #[arg(long)]
    simulated: bool,

    /// Override the configured error policy (skip_silently | skip_and_report | abort_run)
    #[arg(long)]
    on_error: Option<ErrorPolicy>,

    /// Config file (TOML or JSON); defaults to $CURATOR_CONFIG_PATH or config/curator.*
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("legal_ai_news=info,warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(p) => AppConfig::from_file(p)?.resolve_credentials(|k| std::env::var(k).ok())?,
        None => AppConfig::load()?,
    };
    if let Some(policy) = cli.on_error {
        cfg.on_error = policy;
    }

    let pipeline = Pipeline::from_config(&cfg)?;
    let outcome = if cli.simulated {
        pipeline.run_from(&StaticSource::simulated(Utc::now())).await?
    } else {
        pipeline.run().await?
    };

    let bytes = to_csv(&outcome.report)?;
    std::fs::write(&cli.output, bytes)
        .with_context(|| format!("writing {}", cli.output.display()))?;

    if let Some(p) = &cli.html {
        std::fs::write(p, render_html(&outcome.report))
            .with_context(|| format!("writing {}", p.display()))?;
    }

    println!(
        "{} notícia(s) exportada(s) para {}",
        outcome.report.len(),
        cli.output.display()
    );
    if !outcome.failures.is_empty() {
        eprintln!("{} notícia(s) não processada(s):", outcome.failure_count());
        for f in &outcome.failures {
            eprintln!("  [{}] {} ({}): {}", f.kind, f.title, f.link, f.message);
        }
    }
    Ok(())
}
