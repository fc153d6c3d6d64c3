//! Storage tier error types

use thiserror::Error;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur at any storage tier
///
/// None of these ever reach an HTTP response; they are recorded in the
/// fan-out outcome and logged.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Schema or policy initialization failed
    #[error("storage initialization failed: {0}")]
    Init(String),

    /// Hot-tier write or query failed
    #[error("hot tier: {0}")]
    Hot(#[source] sqlx::Error),

    /// Warm-tier write or query failed
    #[error("warm tier: {0}")]
    Warm(#[source] sqlx::Error),

    /// Cold-tier request failed
    #[error("cold tier: {0}")]
    Cold(String),

    /// Pool handle could not produce a connection
    #[error(transparent)]
    DataPlane(#[from] foundry_dataplane::DataPlaneError),

    /// Reading could not be serialized for archival
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// Create an Init error
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Init(msg.into())
    }

    /// Create a Cold error
    pub fn cold(msg: impl Into<String>) -> Self {
        Self::Cold(msg.into())
    }
}
