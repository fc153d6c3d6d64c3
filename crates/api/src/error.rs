//! API error types
//!
//! Only validation failures, tenant-access errors, and catastrophic parse
//! errors reach clients. Storage, notification, and observability failures
//! are invisible at request time.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use foundry_tenant::TenantError;
use thiserror::Error;

use crate::envelope::Envelope;

/// Errors surfaced to HTTP clients
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body is missing required fields or carries bad values
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Request body is not parseable JSON
    #[error("Internal server error")]
    MalformedBody(String),

    /// No tenant identifier in any recognized location
    #[error("Tenant identifier required")]
    TenantMissing,

    /// Tenant not present in the directory
    #[error("Unknown tenant '{0}'")]
    TenantUnknown(String),

    /// Rate-limit rejection
    #[error("Rate limit exceeded")]
    RateLimited(String),

    /// Compliance or policy rejection
    #[error("Access denied")]
    Forbidden(String),

    /// Queried entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Anything else; never carries internal detail to the client
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::MalformedBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::TenantMissing => StatusCode::BAD_REQUEST,
            Self::TenantUnknown(_) => StatusCode::NOT_FOUND,
            Self::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<Vec<String>> {
        match self {
            Self::Validation(problems) => Some(problems.clone()),
            Self::MalformedBody(detail) => Some(vec![detail.clone()]),
            Self::TenantMissing => Some(vec![
                "provide X-Tenant-ID, a bearer token, a tenant subdomain, \
                 a tenant_id query parameter, or a prefixed API key"
                    .to_string(),
            ]),
            _ => None,
        }
    }
}

impl From<TenantError> for ApiError {
    fn from(err: TenantError) -> Self {
        match err {
            TenantError::Missing => Self::TenantMissing,
            TenantError::Unknown(id) => Self::TenantUnknown(id),
            // Rate exhaustion retries; compliance rejection does not
            TenantError::Denied(msg) if msg.contains("limit") => Self::RateLimited(msg),
            TenantError::Denied(msg) => Self::Forbidden(msg),
            TenantError::Directory(msg) | TenantError::InvalidRecord { message: msg, .. } => {
                Self::Internal(msg)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = ?self, status = %status, "request failed");
        } else {
            tracing::warn!(error = %self, status = %status, "request rejected");
        }

        let body = Envelope::failure(self.to_string(), self.details());
        (status, Json(body)).into_response()
    }
}
