//! Ingestion orchestrator
//!
//! The request critical path: tenant resolution, validation, enrichment,
//! synchronous anomaly detection, and alert dispatch - then storage fan-out
//! and the sensor-data publish are launched detached and the response goes
//! out. A client disconnect after launch does not cancel the detached work.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use foundry_detect::RawReading;
use foundry_storage::FanoutJob;
use futures::future::join_all;

use crate::envelope::{Envelope, IngestData};
use crate::error::ApiError;
use crate::request::{generate_request_id, request_meta};
use crate::state::AppState;

/// Latency SLA for the request-response path
pub const SLA_MS: u64 = 500;

/// POST /data and POST /webhook/events - ingest one reading
pub async fn ingest(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_id = generate_request_id();
    state.metrics.request_received();

    // 1. Tenant resolution gates everything
    let meta = request_meta(&headers, &query);
    let ctx = match state.resolver.resolve(&meta).await {
        Ok(ctx) => ctx,
        Err(e) => {
            state.metrics.tenant_rejection();
            return ApiError::from(e).into_response();
        }
    };

    // 2. Tenant usage tick
    state
        .observability
        .record_count("tenant.requests", 1, &[("tenant", &ctx.tenant_id)]);

    // 3. Parse and validate
    let raw: RawReading = match serde_json::from_slice(&body) {
        Ok(raw) => raw,
        Err(e) => return ApiError::MalformedBody(e.to_string()).into_response(),
    };
    let mut reading = match raw.validate() {
        Ok(reading) => reading,
        Err(problems) => {
            state.metrics.validation_failure();
            return ApiError::Validation(problems).into_response();
        }
    };

    let plane = match state.selector.select(&ctx) {
        Ok(plane) => plane,
        Err(e) => return ApiError::Internal(e.to_string()).into_response(),
    };

    // 4. Enrich
    reading.enrich(Utc::now());

    // 5. Detect
    let anomalies = state.detector.detect(&reading);
    state.metrics.anomalies(anomalies.len() as u64);
    if !anomalies.is_empty() {
        reading.attach_anomalies(anomalies.clone());
    }

    // 6. Dispatch alerts for high/critical anomalies, concurrently
    let outcomes = join_all(
        anomalies
            .iter()
            .filter(|a| a.severity.is_alertable())
            .map(|a| state.dispatcher.dispatch(a, Some(&reading), &ctx, &plane, started)),
    )
    .await;
    let alerts_created = outcomes.len();
    state.metrics.alerts(alerts_created as u64);

    // 7. Detached background work - never awaited by this response
    state.fanout_pool.try_submit(FanoutJob {
        reading: reading.clone(),
        ctx: Arc::clone(&ctx),
        plane: plane.clone(),
        request_id: request_id.clone(),
    });
    spawn_sensor_data_publish(&state, &plane.topics.sensor_data, &reading, &request_id);

    // 8. Respond
    state.metrics.reading_accepted();
    let processing_latency_ms = started.elapsed().as_millis() as u64;
    let sla_compliant = processing_latency_ms < SLA_MS;
    if !sla_compliant {
        state.metrics.sla_breach();
        tracing::warn!(
            request_id = %request_id,
            latency_ms = processing_latency_ms,
            "request exceeded latency SLA"
        );
    }

    tracing::info!(
        request_id = %request_id,
        tenant_id = %ctx.tenant_id,
        equipment_id = %reading.equipment_id,
        anomalies = anomalies.len(),
        alerts = alerts_created,
        latency_ms = processing_latency_ms,
        "reading accepted"
    );

    Json(Envelope::ok(IngestData {
        message: "reading accepted",
        equipment_id: reading.equipment_id,
        timestamp: reading.timestamp,
        anomalies_detected: anomalies.len(),
        alerts_created,
        processing_latency_ms,
        sla_compliant,
    }))
    .into_response()
}

/// Publish the enriched reading to the tenant's sensor-data topic
fn spawn_sensor_data_publish(
    state: &AppState,
    topic: &str,
    reading: &foundry_detect::SensorReading,
    request_id: &str,
) {
    let payload = match serde_json::to_vec(reading) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "reading serialization failed");
            return;
        }
    };

    let publisher = Arc::clone(&state.publisher);
    let topic = topic.to_string();
    let key = reading.equipment_id.clone();
    let request_id = request_id.to_string();
    let headers = foundry_stream::MessageHeaders {
        severity: None,
        equipment_id: Some(key.clone()),
    };

    tokio::spawn(async move {
        if let Err(e) = publisher.publish(&topic, &key, &payload, &headers).await {
            tracing::warn!(
                request_id = %request_id,
                topic = %topic,
                error = %e,
                "sensor-data publish failed"
            );
        }
    });
}
