//! Configuration error types

use thiserror::Error;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is not set
    #[error("missing required environment variable '{name}'")]
    MissingVar {
        /// Variable name
        name: &'static str,
    },

    /// Environment variable is set but cannot be parsed
    #[error("invalid value for '{name}': {message}")]
    InvalidVar {
        /// Variable name
        name: &'static str,
        /// Error message
        message: String,
    },

    /// Validation error - invalid combination of settings
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create a MissingVar error
    pub fn missing(name: &'static str) -> Self {
        Self::MissingVar { name }
    }

    /// Create an InvalidVar error
    pub fn invalid_var(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidVar {
            name,
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}
