//! Foundry HTTP Surface
//!
//! The ingestion orchestrator and read-only query endpoints.
//!
//! # Request flow
//!
//! ```text
//! POST /data ──> tenant resolve ──> validate ──> enrich ──> detect
//!                                                             │
//!                       ┌── alert dispatch (awaited, ≥ high) ─┘
//!                       │
//!                 200 response        fan-out + stream publish (detached)
//! ```
//!
//! The response leaves after alert dispatch; storage and the sensor-data
//! publish complete in the background and can never fail a request.

mod envelope;
mod error;
mod metrics;
mod request;
mod routes;
mod state;

pub use envelope::{Envelope, IngestData};
pub use error::ApiError;
pub use metrics::{IngestMetrics, IngestSnapshot};
pub use request::{generate_request_id, request_meta};
pub use routes::{SLA_MS, build_router};
pub use state::{AppState, Runtime, RuntimeError};
