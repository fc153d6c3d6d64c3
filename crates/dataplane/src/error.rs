//! Data-plane error types

use thiserror::Error;

/// Result type for data-plane operations
pub type Result<T> = std::result::Result<T, DataPlaneError>;

/// Errors that can occur while selecting or using data-plane resources
#[derive(Debug, Error)]
pub enum DataPlaneError {
    /// A pool could not be created from its connection string
    #[error("failed to create pool for '{tenant_id}': {message}")]
    PoolCreate {
        /// Tenant the pool belongs to
        tenant_id: String,
        /// Underlying failure
        message: String,
    },

    /// Connection acquisition failed or timed out
    #[error("connection acquisition failed: {0}")]
    Acquire(#[source] sqlx::Error),

    /// Setting the tenant session variable failed
    #[error("failed to scope session to tenant '{tenant_id}': {source}")]
    SessionScope {
        /// Tenant being scoped to
        tenant_id: String,
        /// Underlying failure
        #[source]
        source: sqlx::Error,
    },

    /// Tenant record is unusable for selection
    #[error("tenant '{tenant_id}' has no usable data plane: {message}")]
    Unusable {
        /// Offending tenant
        tenant_id: String,
        /// What is missing
        message: String,
    },
}

impl DataPlaneError {
    /// Create a PoolCreate error
    pub fn pool_create(tenant_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PoolCreate {
            tenant_id: tenant_id.into(),
            message: message.into(),
        }
    }

    /// Create an Unusable error
    pub fn unusable(tenant_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unusable {
            tenant_id: tenant_id.into(),
            message: message.into(),
        }
    }
}
