//! Request helpers

use std::collections::HashMap;

use axum::http::HeaderMap;
use foundry_tenant::RequestMeta;

/// Build the tenant-resolution view of a request
///
/// Copies the headers tenant resolution reads plus the optional edge
/// region; everything else stays behind in the axum request.
pub fn request_meta(headers: &HeaderMap, query: &HashMap<String, String>) -> RequestMeta {
    let mut meta = RequestMeta::new();

    for name in ["x-tenant-id", "authorization", "host", "x-api-key"] {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            meta = meta.with_header(name, value);
        }
    }

    if let Some(region) = headers.get("x-source-region").and_then(|v| v.to_str().ok()) {
        meta = meta.with_source_region(region);
    }

    for (name, value) in query {
        meta = meta.with_query(name, value.clone());
    }

    meta
}

/// Generate a request id for log correlation
pub fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("req_{ts:x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_meta_carries_tenant_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Tenant-ID", HeaderValue::from_static("acme-corp"));
        headers.insert("X-Source-Region", HeaderValue::from_static("us-east-1"));

        let meta = request_meta(&headers, &HashMap::new());
        assert_eq!(meta.header("x-tenant-id"), Some("acme-corp"));
        assert_eq!(meta.source_region.as_deref(), Some("us-east-1"));
    }

    #[test]
    fn test_request_ids_differ() {
        assert_ne!(generate_request_id(), generate_request_id());
    }
}
