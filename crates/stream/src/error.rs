//! Stream publisher error types

use thiserror::Error;

/// Result type for stream operations
pub type Result<T> = std::result::Result<T, StreamError>;

/// Errors that can occur while publishing to the stream bus
#[derive(Debug, Error)]
pub enum StreamError {
    /// Producer could not be created from the broker configuration
    #[error("failed to create stream producer: {0}")]
    Create(String),

    /// Delivery to a topic failed
    #[error("publish to '{topic}' failed: {message}")]
    Publish {
        /// Target topic
        topic: String,
        /// Broker-reported failure
        message: String,
    },

    /// Delivery did not complete within the caller's budget
    #[error("publish to '{topic}' timed out after {budget_ms} ms")]
    Timeout {
        /// Target topic
        topic: String,
        /// Budget that was exceeded
        budget_ms: u64,
    },

    /// The bounded critical queue is full - the only backpressure signal
    /// the ingestion path honors
    #[error("critical alert queue full")]
    QueueFull,

    /// The critical queue worker has shut down
    #[error("critical alert queue closed")]
    QueueClosed,
}

impl StreamError {
    /// Create a Publish error
    pub fn publish(topic: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Publish {
            topic: topic.into(),
            message: message.into(),
        }
    }
}
