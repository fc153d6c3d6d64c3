//! Extraction chain tests
//!
//! Every identifier source must resolve on its own, and the priority order
//! must hold when several are present.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use super::{RequestMeta, extract_tenant_id};

const PLATFORM: &str = "foundry";

/// Build a JWT-shaped token whose payload carries the given claims
fn bearer_token(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
    format!("{header}.{payload}.signature")
}

#[test]
fn test_header_source() {
    let meta = RequestMeta::new().with_header("X-Tenant-ID", "acme-corp");
    assert_eq!(extract_tenant_id(&meta, PLATFORM).as_deref(), Some("acme-corp"));
}

#[test]
fn test_header_is_case_insensitive() {
    let meta = RequestMeta::new().with_header("x-TENANT-id", "acme-corp");
    assert_eq!(extract_tenant_id(&meta, PLATFORM).as_deref(), Some("acme-corp"));
}

#[test]
fn test_bearer_source() {
    let token = bearer_token(serde_json::json!({"sub": "u1", "tenant_id": "acme-corp"}));
    let meta = RequestMeta::new().with_header("Authorization", format!("Bearer {token}"));
    assert_eq!(extract_tenant_id(&meta, PLATFORM).as_deref(), Some("acme-corp"));
}

#[test]
fn test_bearer_without_claim_is_skipped() {
    let token = bearer_token(serde_json::json!({"sub": "u1"}));
    let meta = RequestMeta::new().with_header("Authorization", format!("Bearer {token}"));
    assert_eq!(extract_tenant_id(&meta, PLATFORM), None);
}

#[test]
fn test_bearer_malformed_token_is_skipped() {
    let meta = RequestMeta::new().with_header("Authorization", "Bearer not-a-jwt");
    assert_eq!(extract_tenant_id(&meta, PLATFORM), None);
}

#[test]
fn test_subdomain_source() {
    let meta = RequestMeta::new().with_header("Host", "acme-corp.foundry.io");
    assert_eq!(extract_tenant_id(&meta, PLATFORM).as_deref(), Some("acme-corp"));
}

#[test]
fn test_subdomain_ignores_port() {
    let meta = RequestMeta::new().with_header("Host", "acme-corp.foundry.io:8443");
    assert_eq!(extract_tenant_id(&meta, PLATFORM).as_deref(), Some("acme-corp"));
}

#[test]
fn test_subdomain_requires_platform_label() {
    let meta = RequestMeta::new().with_header("Host", "acme-corp.other.io");
    assert_eq!(extract_tenant_id(&meta, PLATFORM), None);
}

#[test]
fn test_subdomain_requires_three_labels() {
    let meta = RequestMeta::new().with_header("Host", "foundry.io");
    assert_eq!(extract_tenant_id(&meta, PLATFORM), None);
}

#[test]
fn test_query_source() {
    let meta = RequestMeta::new().with_query("tenant_id", "acme-corp");
    assert_eq!(extract_tenant_id(&meta, PLATFORM).as_deref(), Some("acme-corp"));
}

#[test]
fn test_api_key_source() {
    let meta = RequestMeta::new().with_header("X-API-Key", "acme-corp_9f8e7d6c");
    assert_eq!(extract_tenant_id(&meta, PLATFORM).as_deref(), Some("acme-corp"));
}

#[test]
fn test_api_key_without_underscore_is_skipped() {
    let meta = RequestMeta::new().with_header("X-API-Key", "opaquekey");
    assert_eq!(extract_tenant_id(&meta, PLATFORM), None);
}

#[test]
fn test_priority_header_beats_everything() {
    let token = bearer_token(serde_json::json!({"tenant_id": "from-token"}));
    let meta = RequestMeta::new()
        .with_header("X-Tenant-ID", "from-header")
        .with_header("Authorization", format!("Bearer {token}"))
        .with_header("Host", "from-host.foundry.io")
        .with_query("tenant_id", "from-query")
        .with_header("X-API-Key", "from-key_secret");
    assert_eq!(extract_tenant_id(&meta, PLATFORM).as_deref(), Some("from-header"));
}

#[test]
fn test_priority_token_beats_host_query_key() {
    let token = bearer_token(serde_json::json!({"tenant_id": "from-token"}));
    let meta = RequestMeta::new()
        .with_header("Authorization", format!("Bearer {token}"))
        .with_header("Host", "from-host.foundry.io")
        .with_query("tenant_id", "from-query")
        .with_header("X-API-Key", "from-key_secret");
    assert_eq!(extract_tenant_id(&meta, PLATFORM).as_deref(), Some("from-token"));
}

#[test]
fn test_priority_query_beats_api_key() {
    let meta = RequestMeta::new()
        .with_query("tenant_id", "from-query")
        .with_header("X-API-Key", "from-key_secret");
    assert_eq!(extract_tenant_id(&meta, PLATFORM).as_deref(), Some("from-query"));
}

#[test]
fn test_no_source_yields_none() {
    let meta = RequestMeta::new().with_header("Content-Type", "application/json");
    assert_eq!(extract_tenant_id(&meta, PLATFORM), None);
}
