//! Foundry Anomaly Detection
//!
//! The sensor reading model and the synchronous threshold-band detector
//! that runs on the ingestion critical path.
//!
//! Detection is pure and allocation-bounded; statistical or
//! historical-baseline detection composes behind the same `detect`
//! signature and is deliberately not part of this crate.

mod anomaly;
mod detector;
mod reading;
mod thresholds;

pub use anomaly::{Anomaly, AnomalyKind, Severity};
pub use detector::AnomalyDetector;
pub use reading::{HTTP_INGEST_SOURCE, RawReading, SensorReading};
pub use thresholds::{Band, Thresholds};
