//! Tenant resolution error types

use thiserror::Error;

/// Result type for tenant operations
pub type Result<T> = std::result::Result<T, TenantError>;

/// Errors that can occur while resolving a request to a tenant
///
/// `Clone` is required so an in-flight directory load can hand the same
/// failure to every caller waiting on it.
#[derive(Debug, Clone, Error)]
pub enum TenantError {
    /// No tenant identifier found in any of the recognized request locations
    #[error("no tenant identifier found in request")]
    Missing,

    /// Identifier was present but the directory has no such tenant
    #[error("unknown tenant '{0}'")]
    Unknown(String),

    /// Tenant exists but the request violates its access policy
    #[error("tenant access denied: {0}")]
    Denied(String),

    /// The tenant directory itself failed
    #[error("tenant directory error: {0}")]
    Directory(String),

    /// Directory entry violates the deployment-mode invariants
    #[error("invalid tenant record for '{tenant_id}': {message}")]
    InvalidRecord {
        /// Offending tenant
        tenant_id: String,
        /// What is wrong with the record
        message: String,
    },
}

impl TenantError {
    /// Create a Denied error
    pub fn denied(message: impl Into<String>) -> Self {
        Self::Denied(message.into())
    }

    /// Create a Directory error
    pub fn directory(message: impl Into<String>) -> Self {
        Self::Directory(message.into())
    }

    /// Create an InvalidRecord error
    pub fn invalid_record(tenant_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            tenant_id: tenant_id.into(),
            message: message.into(),
        }
    }
}
