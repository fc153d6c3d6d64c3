//! Query surface
//!
//! Read-only endpoints over the three tiers. Every operation resolves
//! tenant context, obtains data-plane handles, and ticks the tenant usage
//! counter - reads are metered the same as writes.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Duration, Utc};
use foundry_tenant::TenantContext;
use serde::Serialize;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::request::request_meta;
use crate::state::AppState;

/// Default lookback for recent readings
const DEFAULT_RECENT_HOURS: i64 = 24;

/// Default lookback for historical key listing
const DEFAULT_HISTORY_DAYS: i64 = 30;

/// Cap on listed historical keys
const HISTORY_KEY_CAP: usize = 1000;

async fn resolve(
    state: &AppState,
    headers: &HeaderMap,
    query: &HashMap<String, String>,
) -> Result<(std::sync::Arc<TenantContext>, foundry_dataplane::DataPlane), ApiError> {
    let meta = request_meta(headers, query);
    let ctx = state.resolver.resolve(&meta).await?;

    state
        .observability
        .record_count("tenant.requests", 1, &[("tenant", &ctx.tenant_id)]);

    let plane = state
        .selector
        .select(&ctx)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok((ctx, plane))
}

/// GET /equipment - every equipment's current status (warm tier)
pub async fn list_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let (_ctx, plane) = match resolve(&state, &headers, &query).await {
        Ok(resolved) => resolved,
        Err(e) => return e.into_response(),
    };

    match foundry_storage::list_status(&plane.warm).await {
        Ok(rows) => Json(Envelope::ok(rows)).into_response(),
        Err(e) => ApiError::Internal(e.to_string()).into_response(),
    }
}

/// GET /equipment/{id} - one equipment's current status (warm tier)
pub async fn get_status(
    State(state): State<AppState>,
    Path(equipment_id): Path<String>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let (_ctx, plane) = match resolve(&state, &headers, &query).await {
        Ok(resolved) => resolved,
        Err(e) => return e.into_response(),
    };

    match foundry_storage::get_status(&plane.warm, &equipment_id).await {
        Ok(Some(row)) => Json(Envelope::ok(row)).into_response(),
        Ok(None) => ApiError::NotFound(format!("equipment '{equipment_id}'")).into_response(),
        Err(e) => ApiError::Internal(e.to_string()).into_response(),
    }
}

/// GET /equipment/{id}/readings?hours= - recent readings (hot tier)
pub async fn recent_readings(
    State(state): State<AppState>,
    Path(equipment_id): Path<String>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let (_ctx, plane) = match resolve(&state, &headers, &query).await {
        Ok(resolved) => resolved,
        Err(e) => return e.into_response(),
    };

    let hours = query
        .get("hours")
        .and_then(|h| h.parse::<i64>().ok())
        .filter(|h| *h > 0)
        .unwrap_or(DEFAULT_RECENT_HOURS);
    let since = Utc::now() - Duration::hours(hours);

    match foundry_storage::recent_readings(&plane.hot, &equipment_id, since).await {
        Ok(rows) => Json(Envelope::ok(rows)).into_response(),
        Err(e) => ApiError::Internal(e.to_string()).into_response(),
    }
}

/// Payload for the historical key listing
#[derive(Debug, Serialize)]
struct HistoryData {
    equipment_id: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    keys: Vec<String>,
}

/// GET /equipment/{id}/metrics?start_time=&end_time= - archive keys (cold tier)
///
/// Returns object keys only; bodies never travel through this surface.
pub async fn history_keys(
    State(state): State<AppState>,
    Path(equipment_id): Path<String>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let (_ctx, plane) = match resolve(&state, &headers, &query).await {
        Ok(resolved) => resolved,
        Err(e) => return e.into_response(),
    };

    let end_time = match parse_bound(&query, "end_time") {
        Ok(bound) => bound.unwrap_or_else(Utc::now),
        Err(e) => return e.into_response(),
    };
    let start_time = match parse_bound(&query, "start_time") {
        Ok(bound) => bound.unwrap_or_else(|| end_time - Duration::days(DEFAULT_HISTORY_DAYS)),
        Err(e) => return e.into_response(),
    };

    if start_time > end_time {
        return ApiError::Validation(vec!["start_time must not exceed end_time".into()])
            .into_response();
    }

    match state
        .cold
        .list_keys(&plane.object, &equipment_id, start_time, end_time, HISTORY_KEY_CAP)
        .await
    {
        Ok(keys) => Json(Envelope::ok(HistoryData {
            equipment_id,
            start_time,
            end_time,
            keys,
        }))
        .into_response(),
        Err(e) => ApiError::Internal(e.to_string()).into_response(),
    }
}

fn parse_bound(
    query: &HashMap<String, String>,
    name: &str,
) -> Result<Option<DateTime<Utc>>, ApiError> {
    match query.get(name) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<DateTime<Utc>>()
            .map(Some)
            .map_err(|_| ApiError::Validation(vec![format!("{name} must be RFC-3339")])),
    }
}
