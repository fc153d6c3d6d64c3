//! Foundry Stream Publisher
//!
//! Publishes reading and alert messages to partitioned topics with
//! latency-first producer settings.
//!
//! # Delivery modes
//!
//! - **Awaited**: sensor-data and high-severity alert publishes; callers
//!   bound the wait with [`StreamPublisher::publish_with_timeout`].
//! - **Fire-and-forget**: critical alerts go through the bounded
//!   [`CriticalQueue`] drained by a dedicated worker; the ingestion path
//!   never awaits delivery and only sees backpressure when the queue is
//!   full.
//!
//! Errors surface in logs; they are never propagated to HTTP response
//! paths.

mod critical;
mod error;
mod publisher;

pub use critical::{
    CriticalMessage, CriticalQueue, DEFAULT_CRITICAL_QUEUE_SIZE, spawn_drain,
};
pub use error::{Result, StreamError};
pub use publisher::{MessageHeaders, StreamPublisher};
