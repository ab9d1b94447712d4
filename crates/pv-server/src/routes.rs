//! HTTP route handlers for the ProbViz server.
//!
//! All endpoints live under `/api/` and return JSON. Query parameters that do
//! not parse are ignored, so the family or sampler default applies.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use pv_prob::sampling::DEFAULT_SAMPLE_SIZE;
use pv_prob::{DistributionSpec, RawParams, SampleBatch, sampling};
use pv_viz::{CurveArtifact, SamplesArtifact};

use crate::state::SharedState;

type QueryMap = HashMap<String, String>;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/distribution/{family}", get(distribution_handler))
        .route("/api/sampling/negative-binomial", get(negative_binomial_handler))
        .route("/api/sampling/geometric", get(geometric_handler))
        .route("/api/sampling/geometric-sum", get(geometric_sum_handler))
        .route("/api/health", get(health_handler))
}

// ---------------------------------------------------------------------------
// GET /api/distribution/{family}
// ---------------------------------------------------------------------------

async fn distribution_handler(
    State(state): State<SharedState>,
    Path(family): Path<String>,
    Query(query): Query<QueryMap>,
) -> Result<Json<CurveArtifact>, AppError> {
    state.inflight.fetch_add(1, Ordering::Relaxed);
    let _dec = DecrementOnDrop(&state.inflight);
    state.total_requests.fetch_add(1, Ordering::Relaxed);

    let raw = real_params(&query);
    let spec = DistributionSpec::parse(&family, &raw)?;
    tracing::debug!(family = %family, ?spec, "distribution request");

    let curve = tokio::task::spawn_blocking(move || -> pv_core::Result<CurveArtifact> {
        let handle = spec.handle()?;
        Ok(CurveArtifact::from_handle(&handle))
    })
    .await
    .map_err(|e| AppError::internal(format!("task panicked: {e}")))??;

    Ok(Json(curve))
}

// ---------------------------------------------------------------------------
// GET /api/sampling/*
// ---------------------------------------------------------------------------

async fn negative_binomial_handler(
    State(state): State<SharedState>,
    Query(query): Query<QueryMap>,
) -> Result<Json<SamplesArtifact>, AppError> {
    let r = int_param(&query, "r", 5);
    let p = real_param(&query, "p", 0.5);
    let size = capped_size(&query, state.max_sample_size);
    run_sampler(&state, move || sampling::negative_binomial(r, p, size)).await
}

async fn geometric_handler(
    State(state): State<SharedState>,
    Query(query): Query<QueryMap>,
) -> Result<Json<SamplesArtifact>, AppError> {
    let p = real_param(&query, "p", 0.5);
    let size = capped_size(&query, state.max_sample_size);
    run_sampler(&state, move || sampling::geometric(p, size)).await
}

async fn geometric_sum_handler(
    State(state): State<SharedState>,
    Query(query): Query<QueryMap>,
) -> Result<Json<SamplesArtifact>, AppError> {
    let p = real_param(&query, "p", 0.5);
    let r = int_param(&query, "r", 10);
    let size = capped_size(&query, state.max_sample_size);
    run_sampler(&state, move || sampling::geometric_sum(p, r, size)).await
}

/// Count the request and draw the batch off the reactor.
async fn run_sampler<F>(state: &SharedState, draw: F) -> Result<Json<SamplesArtifact>, AppError>
where
    F: FnOnce() -> pv_core::Result<SampleBatch> + Send + 'static,
{
    state.inflight.fetch_add(1, Ordering::Relaxed);
    let _dec = DecrementOnDrop(&state.inflight);
    state.total_requests.fetch_add(1, Ordering::Relaxed);

    let batch = tokio::task::spawn_blocking(draw)
        .await
        .map_err(|e| AppError::internal(format!("task panicked: {e}")))??;
    tracing::debug!(n = batch.len(), "sample batch drawn");

    Ok(Json(SamplesArtifact::from(batch)))
}

// ---------------------------------------------------------------------------
// GET /api/health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_s: f64,
    inflight: u64,
    total_requests: u64,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: pv_core::VERSION,
        uptime_s: state.started_at.elapsed().as_secs_f64(),
        inflight: state.inflight.load(Ordering::Relaxed),
        total_requests: state.total_requests.load(Ordering::Relaxed),
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Every query value that parses as a number; the rest are dropped.
fn real_params(query: &QueryMap) -> RawParams {
    query
        .iter()
        .filter_map(|(k, v)| match v.trim().parse::<f64>() {
            Ok(x) => Some((k.clone(), x)),
            Err(_) => {
                tracing::debug!(param = %k, value = %v, "ignoring unparsable parameter");
                None
            }
        })
        .collect()
}

fn real_param(query: &QueryMap, name: &str, default: f64) -> f64 {
    query.get(name).and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn int_param(query: &QueryMap, name: &str, default: i64) -> i64 {
    query.get(name).and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// Requested `size` with the sampler's non-positive fallback applied, then
/// capped at `max`.
fn capped_size(query: &QueryMap, max: usize) -> i64 {
    let size = int_param(query, "size", DEFAULT_SAMPLE_SIZE as i64);
    let size = if size <= 0 { DEFAULT_SAMPLE_SIZE as i64 } else { size };
    let max = i64::try_from(max).unwrap_or(i64::MAX);
    if size > max {
        tracing::debug!(size, max, "capping sample size");
    }
    size.min(max)
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Structured JSON error response.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn not_found(msg: String) -> Self {
        Self { status: StatusCode::NOT_FOUND, message: msg }
    }

    fn internal(msg: String) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: msg }
    }
}

impl From<pv_core::Error> for AppError {
    fn from(err: pv_core::Error) -> Self {
        match err {
            pv_core::Error::Validation(msg) => Self::not_found(msg),
            other => Self::internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "request failed");
        }
        let body = serde_json::json!({
            "error": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

/// RAII guard to decrement an atomic counter on drop.
struct DecrementOnDrop<'a>(&'a AtomicU64);

impl Drop for DecrementOnDrop<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}
