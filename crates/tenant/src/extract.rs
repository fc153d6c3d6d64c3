//! Tenant identifier extraction
//!
//! A request can carry its tenant identity in five places. Extraction is a
//! fallback chain of small functions tried in a fixed priority order; the
//! first hit wins:
//!
//! 1. `X-Tenant-ID` header
//! 2. `tenant_id` claim of a JWT-shaped `Authorization: Bearer` token
//! 3. Host header subdomain (`<tenant>.<platform>.<tld>`)
//! 4. `tenant_id` query parameter
//! 5. `X-API-Key` prefix before the first underscore

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Framework-agnostic view of the request parts tenant resolution reads
///
/// Header names are stored lowercased so lookups are case-insensitive.
#[derive(Debug, Default, Clone)]
pub struct RequestMeta {
    headers: HashMap<String, String>,
    query: HashMap<String, String>,
    /// Region the request entered through, when the edge provides it
    pub source_region: Option<String>,
}

impl RequestMeta {
    /// Create an empty request view
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header (name is lowercased)
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Add a query parameter
    pub fn with_query(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.insert(name.to_string(), value.into());
        self
    }

    /// Set the source region
    pub fn with_source_region(mut self, region: impl Into<String>) -> Self {
        self.source_region = Some(region.into());
        self
    }

    /// Look up a header by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Look up a query parameter
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}

/// Run the extraction chain, returning the first identifier found
pub fn extract_tenant_id(meta: &RequestMeta, platform_domain: &str) -> Option<String> {
    from_tenant_header(meta)
        .or_else(|| from_bearer_token(meta))
        .or_else(|| from_host_subdomain(meta, platform_domain))
        .or_else(|| from_query_param(meta))
        .or_else(|| from_api_key(meta))
}

/// 1. `X-Tenant-ID` header
fn from_tenant_header(meta: &RequestMeta) -> Option<String> {
    meta.header("x-tenant-id")
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// 2. `tenant_id` claim of a JWT-shaped bearer token
///
/// The payload segment is base64-decoded and inspected without signature
/// verification; this layer only routes, it does not authenticate.
fn from_bearer_token(meta: &RequestMeta) -> Option<String> {
    let token = meta.header("authorization")?.strip_prefix("Bearer ")?.trim();

    let mut segments = token.split('.');
    let (_header, payload, _sig) = (segments.next()?, segments.next()?, segments.next()?);
    if segments.next().is_some() {
        return None;
    }

    let decoded = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&decoded).ok()?;

    claims
        .get("tenant_id")
        .and_then(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// 3. Host subdomain: `<tenant>.<platform>.<tld>` with >= 3 labels
fn from_host_subdomain(meta: &RequestMeta, platform_domain: &str) -> Option<String> {
    let host = meta.header("host")?;
    let host = host.split(':').next().unwrap_or(host);

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() >= 3 && labels[1].eq_ignore_ascii_case(platform_domain) {
        Some(labels[0].to_string()).filter(|l| !l.is_empty())
    } else {
        None
    }
}

/// 4. `tenant_id` query parameter
fn from_query_param(meta: &RequestMeta) -> Option<String> {
    meta.query("tenant_id")
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// 5. `X-API-Key` prefix: keys are minted as `<tenant>_<secret>`
fn from_api_key(meta: &RequestMeta) -> Option<String> {
    let key = meta.header("x-api-key")?;
    let (prefix, _rest) = key.split_once('_')?;
    Some(prefix.to_string()).filter(|p| !p.is_empty())
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod extract_test;
