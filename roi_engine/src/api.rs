//! HTTP API for the ROI engine.
//!
//! This module exposes a thin REST surface around the engine using
//! [`axum`](https://crates.io/crates/axum).  Clients submit a
//! calculation request and receive the result plus display strings.
//! Shared state is the country table and engine configuration, both
//! read-only after startup, so handlers take no locks.

use crate::baseline::{CountryBaseline, CountryBaselineTable};
use crate::config::{EngineConfig, ServerConfig};
use crate::engine::{calculate, calculate_batch, calculate_validated};
use crate::error::{EngineError, IngestionError};
use crate::format::DisplaySummary;
use crate::ingestion::{IngestionRecord, IngestionSink, LogSink};
use crate::models::{CalculationInput, CalculationResult};
use crate::validation::validate;
use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Application state shared across requests.
pub struct AppState {
    pub table: CountryBaselineTable,
    pub config: EngineConfig,
    pub sink: Arc<dyn IngestionSink>,
}

impl AppState {
    /// Loads the country table named by `config`, or the built-in one.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let table = match &config.country_table {
            Some(path) => CountryBaselineTable::load_from_path(path)?,
            None => CountryBaselineTable::builtin().clone(),
        };
        anyhow::ensure!(
            !table.is_empty(),
            "country table {} lists no countries",
            table.version()
        );
        info!(
            version = table.version(),
            countries = table.len(),
            "country baselines loaded"
        );
        Ok(Self {
            table,
            config: config.engine.clone(),
            sink: Arc::new(LogSink),
        })
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    violations: Vec<String>,
}

struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn internal(error: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody {
                error: error.to_string(),
                violations: Vec::new(),
            },
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Invalid(errors) => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                body: ErrorBody {
                    error: "invalid calculation input".to_string(),
                    violations: errors.errors().iter().map(|e| e.to_string()).collect(),
                },
            },
            err @ EngineError::Consistency(_) => Self::internal(err),
        }
    }
}

impl From<IngestionError> for ApiError {
    fn from(err: IngestionError) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: ErrorBody {
                error: err.to_string(),
                violations: Vec::new(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub result: CalculationResult,
    pub display: DisplaySummary,
}

impl CalculationResponse {
    fn new(result: CalculationResult) -> Self {
        let display = DisplaySummary::from_result(&result);
        Self { result, display }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchItem {
    Ok { result: CalculationResult },
    Rejected { violations: Vec<String> },
    Failed { error: String },
}

impl From<Result<CalculationResult, EngineError>> for BatchItem {
    fn from(outcome: Result<CalculationResult, EngineError>) -> Self {
        match outcome {
            Ok(result) => BatchItem::Ok { result },
            Err(EngineError::Invalid(errors)) => BatchItem::Rejected {
                violations: errors.errors().iter().map(|e| e.to_string()).collect(),
            },
            Err(err @ EngineError::Consistency(_)) => BatchItem::Failed {
                error: err.to_string(),
            },
        }
    }
}

/// A calculation request plus the contact address for the lead.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(flatten)]
    pub input: CalculationInput,
    pub email: String,
}

#[derive(Debug, Serialize)]
struct CountriesResponse<'a> {
    version: &'a str,
    countries: &'a [CountryBaseline],
}

/// Build the API router over `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/countries", get(countries_handler))
        .route("/api/calculate", post(calculate_handler))
        .route("/api/calculate/batch", post(batch_handler))
        .route("/api/submit", post(submit_handler))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

async fn countries_handler(State(state): State<Arc<AppState>>) -> Response {
    Json(CountriesResponse {
        version: state.table.version(),
        countries: state.table.countries(),
    })
    .into_response()
}

/// Handler for POST /api/calculate
async fn calculate_handler(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CalculationInput>,
) -> Result<Json<CalculationResponse>, ApiError> {
    let result = calculate(&input, &state.table, &state.config)?;
    Ok(Json(CalculationResponse::new(result)))
}

/// Handler for POST /api/calculate/batch
async fn batch_handler(
    State(state): State<Arc<AppState>>,
    Json(inputs): Json<Vec<CalculationInput>>,
) -> Result<Json<Vec<BatchItem>>, ApiError> {
    let outcomes = tokio::task::spawn_blocking(move || {
        calculate_batch(inputs, &state.table, &state.config)
    })
    .await
    .map_err(ApiError::internal)?;
    Ok(Json(outcomes.into_iter().map(BatchItem::from).collect()))
}

/// Handler for POST /api/submit
async fn submit_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<IngestionRecord>), ApiError> {
    let validated = validate(&request.input, &state.table).map_err(EngineError::from)?;
    let result = calculate_validated(&validated, &state.config)?;
    let record = IngestionRecord::from_result(&result, &validated, &request.email)?;
    state.sink.submit(&record).map_err(ApiError::internal)?;
    Ok((StatusCode::ACCEPTED, Json(record)))
}

/// Launch the API server.  Blocks until the server terminates.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = Arc::new(AppState::from_config(&config)?);
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("ROI engine listening on http://{}", config.bind_addr);
    axum::serve(listener, router).await?;
    Ok(())
}
