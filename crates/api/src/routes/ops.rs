//! Operational endpoints

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::state::AppState;

/// GET /health - liveness check
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}

/// Everything `/ops/metrics` reports
#[derive(Debug, Serialize)]
struct OpsMetrics {
    ingest: crate::metrics::IngestSnapshot,
    fanout_queue_depth: usize,
    dedicated_pools: usize,
}

/// GET /ops/metrics - process counters
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(OpsMetrics {
        ingest: state.metrics.snapshot(),
        fanout_queue_depth: state.fanout_pool.depth(),
        dedicated_pools: state.pools.dedicated_count(),
    })
}
