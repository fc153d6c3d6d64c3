//! Alert dispatch error types
//!
//! These errors never cross the dispatcher boundary: per-channel failures
//! are recorded in the outcome and logged, nothing propagates to callers.

use thiserror::Error;

/// Result type for notification channel operations
pub type Result<T> = std::result::Result<T, AlertError>;

/// Errors a notification channel can report
#[derive(Debug, Error)]
pub enum AlertError {
    /// Stream publish failed or timed out
    #[error(transparent)]
    Stream(#[from] foundry_stream::StreamError),

    /// Webhook delivery failed
    #[error("webhook '{url}' failed: {message}")]
    Webhook {
        /// Target URL
        url: String,
        /// Underlying failure
        message: String,
    },

    /// Notification body could not be serialized
    #[error("notification serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Channel exceeded the dispatch budget
    #[error("channel '{0}' exceeded dispatch budget")]
    BudgetExceeded(String),
}

impl AlertError {
    /// Create a Webhook error
    pub fn webhook(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Webhook {
            url: url.into(),
            message: message.into(),
        }
    }
}
