//! Ingestion endpoint integration tests
//!
//! Exercise the full router against a runtime whose pools and producer are
//! lazy, so the critical path is observable without live stores: the
//! response leaves before any storage round-trip, which is exactly the
//! contract under test.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use foundry_api::{Runtime, build_router};
use foundry_config::{
    AppConfig, HOT_ACQUIRE_TIMEOUT_MS, HOT_POOL_SIZE, StoreConfig, StreamConfig,
    WARM_ACQUIRE_TIMEOUT_MS, WARM_POOL_SIZE,
};
use foundry_tenant::TenantDirectory;
use foundry_tenant::test_utils::fixture_directory;

fn test_config() -> AppConfig {
    AppConfig {
        region: "us-east-1".into(),
        bind_addr: "127.0.0.1:0".into(),
        hot_store: StoreConfig {
            host: "hot.invalid".into(),
            port: 5432,
            database: "telemetry".into(),
            user: "ingest".into(),
            password: String::new(),
            max_connections: HOT_POOL_SIZE,
            acquire_timeout_ms: HOT_ACQUIRE_TIMEOUT_MS,
        },
        warm_store: StoreConfig {
            host: "warm.invalid".into(),
            port: 5432,
            database: "equipment".into(),
            user: "ingest".into(),
            password: String::new(),
            max_connections: WARM_POOL_SIZE,
            acquire_timeout_ms: WARM_ACQUIRE_TIMEOUT_MS,
        },
        shared_object_bucket: "foundry-telemetry-test".into(),
        object_store_endpoint: Some("http://127.0.0.1:9000".into()),
        shared_connection_string: None,
        stream: StreamConfig {
            brokers: "127.0.0.1:19092".into(),
            use_tls: false,
        },
        priority_alert_topic: "manufacturing-alerts-priority".into(),
        dashboard_url: "http://localhost:3000".into(),
        environment: "test".into(),
        platform_domain: "foundry".into(),
        tenants_file: None,
    }
}

async fn test_app() -> Router {
    let directory: Arc<dyn TenantDirectory> = Arc::new(fixture_directory());
    let runtime = Runtime::build(test_config(), directory).await.unwrap();
    build_router(Arc::new(runtime))
}

fn ingest_request(tenant: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/data")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(tenant) = tenant {
        builder = builder.header("X-Tenant-ID", tenant);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(json!({}))
}

fn normal_reading() -> String {
    json!({
        "equipment_id": "PUMP_001",
        "timestamp": "2025-11-23T10:30:00Z",
        "temperature": 75.5,
        "vibration": 1.2,
        "pressure": 250.8,
        "facility_id": "FAC_CHICAGO_01",
        "line_id": "LINE_A"
    })
    .to_string()
}

#[tokio::test]
async fn test_normal_reading_accepted() {
    let app = test_app().await;

    let response = app
        .oneshot(ingest_request(Some("acme-corp"), &normal_reading()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["equipment_id"], "PUMP_001");
    assert_eq!(body["data"]["anomalies_detected"], 0);
    assert_eq!(body["data"]["alerts_created"], 0);
    assert_eq!(body["data"]["sla_compliant"], true);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_critical_temperature_creates_alert() {
    let app = test_app().await;

    let body = json!({
        "equipment_id": "FURNACE_003",
        "timestamp": "2025-11-23T10:30:00Z",
        "temperature": 195.7,
        "facility_id": "FAC_CHICAGO_01"
    })
    .to_string();

    let response = app
        .oneshot(ingest_request(Some("acme-corp"), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["anomalies_detected"], 1);
    assert_eq!(body["data"]["alerts_created"], 1);
}

#[tokio::test]
async fn test_medium_severity_creates_no_alert() {
    let app = test_app().await;

    let body = json!({
        "equipment_id": "CHILLER_002",
        "timestamp": "2025-11-23T10:30:00Z",
        "temperature": -15.0
    })
    .to_string();

    let response = app
        .oneshot(ingest_request(Some("acme-corp"), &body))
        .await
        .unwrap();

    let body = response_json(response).await;
    assert_eq!(body["data"]["anomalies_detected"], 1);
    assert_eq!(body["data"]["alerts_created"], 0);
}

#[tokio::test]
async fn test_triple_critical_creates_three_alerts() {
    let app = test_app().await;

    let body = json!({
        "equipment_id": "PRESS_007",
        "timestamp": "2025-11-23T10:30:00Z",
        "temperature": 205.9,
        "vibration": 8.2,
        "pressure": 1150.0
    })
    .to_string();

    let response = app
        .oneshot(ingest_request(Some("acme-corp"), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["anomalies_detected"], 3);
    assert_eq!(body["data"]["alerts_created"], 3);
    assert_eq!(body["data"]["sla_compliant"], true);
}

#[tokio::test]
async fn test_missing_required_fields_is_400_with_details() {
    let app = test_app().await;

    let response = app
        .oneshot(ingest_request(Some("acme-corp"), r#"{"temperature": 75.0}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["success"], false);

    let details = body["details"].as_array().unwrap();
    assert_eq!(details.len(), 2);
    assert!(details[0].as_str().unwrap().contains("equipment_id"));
    assert!(details[1].as_str().unwrap().contains("timestamp"));
}

#[tokio::test]
async fn test_malformed_json_is_500_envelope() {
    let app = test_app().await;

    let response = app
        .oneshot(ingest_request(Some("acme-corp"), "{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Internal server error");
    assert!(!body["details"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_tenant_is_400() {
    let app = test_app().await;

    let response = app
        .oneshot(ingest_request(None, &normal_reading()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Tenant identifier required");
}

#[tokio::test]
async fn test_unknown_tenant_is_404() {
    let app = test_app().await;

    let response = app
        .oneshot(ingest_request(Some("nonesuch"), &normal_reading()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tenant_resolves_from_query_param() {
    let app = test_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/data?tenant_id=acme-corp")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(normal_reading()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app().await;

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cors_header_on_responses() {
    let app = test_app().await;

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://ops.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
