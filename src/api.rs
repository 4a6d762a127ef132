// src/api.rs
//! HTTP surface: run the pipeline on request and return the report as JSON, CSV or HTML.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::error::PipelineError;
use crate::ingest::providers::StaticSource;
use crate::ingest::{normalize_text, RawArticle, MAX_PAGE_SIZE};
use crate::pipeline::{Pipeline, RunOutcome};
use crate::report;

/// Header carrying the number of articles skipped with a reported failure.
pub const FAILURES_HEADER: &str = "x-pipeline-failures";

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/noticias", get(noticias_json))
        .route("/noticias/csv", get(noticias_csv))
        .route("/noticias/html", get(noticias_html))
        .route("/noticias/report", get(noticias_report))
        .route("/noticias/manual", post(noticias_manual))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug)]
pub enum ApiError {
    Pipeline(PipelineError),
    Invalid(String),
    Export(String),
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        ApiError::Pipeline(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::Pipeline(e) => {
                let status = match e {
                    PipelineError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    _ => StatusCode::BAD_GATEWAY,
                };
                (status, e.to_string())
            }
            ApiError::Invalid(m) => (StatusCode::UNPROCESSABLE_ENTITY, m),
            ApiError::Export(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };
        warn!(target: "api", status = status.as_u16(), error = %msg, "request failed");
        (status, Json(serde_json::json!({ "error": msg }))).into_response()
    }
}

async fn run(state: &AppState, route: &'static str) -> Result<RunOutcome, ApiError> {
    let outcome = state.pipeline.run().await?;
    info!(
        target: "api",
        route,
        records = outcome.report.len(),
        failures = outcome.failure_count(),
        "pipeline run served"
    );
    Ok(outcome)
}

fn failures_header(outcome: &RunOutcome) -> [(&'static str, String); 1] {
    [(FAILURES_HEADER, outcome.failure_count().to_string())]
}

async fn noticias_json(State(state): State<AppState>) -> Result<Response, ApiError> {
    let outcome = run(&state, "/noticias").await?;
    let headers = failures_header(&outcome);
    Ok((headers, Json(outcome.report)).into_response())
}

async fn noticias_report(State(state): State<AppState>) -> Result<Response, ApiError> {
    let outcome = run(&state, "/noticias/report").await?;
    Ok((failures_header(&outcome), Json(outcome)).into_response())
}

async fn noticias_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let outcome = run(&state, "/noticias/csv").await?;
    let bytes = report::to_csv(&outcome.report).map_err(|e| ApiError::Export(format!("{e:#}")))?;
    let disposition = format!("attachment; filename=\"{}\"", report::CSV_FILE_NAME);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        failures_header(&outcome),
        bytes,
    )
        .into_response())
}

async fn noticias_html(State(state): State<AppState>) -> Result<Response, ApiError> {
    let outcome = run(&state, "/noticias/html").await?;
    Ok((
        failures_header(&outcome),
        Html(report::render_html(&outcome.report)),
    )
        .into_response())
}

/// One manually entered article (the form variant).
#[derive(Debug, Deserialize)]
pub struct ManualArticle {
    pub title: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub link: String,
    pub text: String,
    /// `dd/mm/yyyy` or `yyyy-mm-dd`; today when absent.
    #[serde(default)]
    pub date: Option<String>,
}

impl ManualArticle {
    fn into_raw(self, index: usize) -> Result<RawArticle, ApiError> {
        let title = normalize_text(&self.title);
        let text = normalize_text(&self.text);
        if title.is_empty() || text.is_empty() {
            return Err(ApiError::Invalid(format!(
                "article {index}: title and text are required"
            )));
        }
        let published_at = match self.date.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => Utc::now(),
            Some(d) => NaiveDate::parse_from_str(d, "%d/%m/%Y")
                .or_else(|_| NaiveDate::parse_from_str(d, "%Y-%m-%d"))
                .ok()
                .and_then(|nd| nd.and_hms_opt(12, 0, 0))
                .map(|ndt| ndt.and_utc())
                .ok_or_else(|| ApiError::Invalid(format!("article {index}: invalid date '{d}'")))?,
        };
        Ok(RawArticle {
            published_at,
            title,
            source: self.source.trim().to_string(),
            url: self.link.trim().to_string(),
            description: None,
            content: Some(text),
        })
    }
}

async fn noticias_manual(
    State(state): State<AppState>,
    Json(items): Json<Vec<ManualArticle>>,
) -> Result<Response, ApiError> {
    if items.is_empty() {
        return Err(ApiError::Invalid("no articles supplied".to_string()));
    }
    if items.len() > usize::from(MAX_PAGE_SIZE) {
        return Err(ApiError::Invalid(format!(
            "at most {MAX_PAGE_SIZE} articles per request"
        )));
    }
    let articles = items
        .into_iter()
        .enumerate()
        .map(|(i, it)| it.into_raw(i))
        .collect::<Result<Vec<_>, _>>()?;

    let source = StaticSource::manual(articles);
    let outcome = state.pipeline.run_from(&source).await?;
    info!(
        target: "api",
        route = "/noticias/manual",
        records = outcome.report.len(),
        failures = outcome.failure_count(),
        "manual run served"
    );
    Ok((failures_header(&outcome), Json(outcome)).into_response())
}
