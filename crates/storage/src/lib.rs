//! Foundry Storage Fan-out
//!
//! Concurrent persistence of accepted readings to three tiers:
//!
//! - **Hot**: `sensor_data_raw` hypertable, 1-hour chunks, 30-day retention
//! - **Warm**: `equipment_status`, one upserted row per equipment
//! - **Cold**: JSON objects at date-partitioned keys
//!
//! The fan-out runs off the request's critical path inside [`FanoutPool`]
//! and never raises to the orchestrator: tier failures land in the
//! [`FanoutOutcome`] and the raw reading is re-archived to the cold-tier
//! error location.

mod cold;
mod error;
mod fanout;
mod hash;
mod hot;
mod keys;
mod metrics;
mod pool;
mod warm;

pub use cold::{ColdStore, SENSOR_TYPE_TAG};
pub use error::{Result, StorageError};
pub use fanout::{FanoutOutcome, StorageFanout};
pub use hash::content_hash;
pub use hot::{HotReading, RECENT_READINGS_CAP};
pub use keys::{UNKNOWN_FACILITY, archive_key, error_key, parse_archive_key};
pub use metrics::{FanoutMetrics, FanoutSnapshot};
pub use pool::{DEFAULT_QUEUE_SIZE, DEFAULT_WORKERS, FanoutJob, FanoutPool};
pub use warm::EquipmentStatus;

/// Initialize hot and warm schemas (startup, idempotent)
pub async fn init_schemas(
    hot_pool: &sqlx::PgPool,
    warm_pool: &sqlx::PgPool,
) -> Result<()> {
    hot::init_schema(hot_pool).await?;
    warm::init_schema(warm_pool).await?;
    Ok(())
}

// Query surface entry points re-exported at the crate root
pub use hot::{reading_count, recent_readings};
pub use warm::{get_status, list_status};
