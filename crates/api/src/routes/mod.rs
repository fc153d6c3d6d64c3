//! Route registration

mod equipment;
mod ingest;
mod ops;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub use ingest::SLA_MS;

/// Build the HTTP router
///
/// CORS is wide open on every response; upstream gateways own origin
/// policy for this surface.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/data", post(ingest::ingest))
        .route("/webhook/events", post(ingest::ingest))
        .route("/equipment", get(equipment::list_status))
        .route("/equipment/{id}", get(equipment::get_status))
        .route("/equipment/{id}/readings", get(equipment::recent_readings))
        .route("/equipment/{id}/metrics", get(equipment::history_keys))
        .route("/health", get(ops::health))
        .route("/ops/metrics", get(ops::metrics))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
