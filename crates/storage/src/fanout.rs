//! Three-tier storage fan-out
//!
//! Persists one reading to the hot, warm, and cold tiers concurrently and
//! reports a per-tier outcome. The fan-out never raises: any tier failure
//! is absorbed into the outcome and the raw reading is additionally
//! archived to the cold-tier error location so no accepted data is lost.

use std::sync::Arc;
use std::time::Instant;

use foundry_dataplane::DataPlane;
use foundry_detect::SensorReading;
use foundry_tenant::TenantContext;
use serde::Serialize;

use crate::cold::ColdStore;
use crate::metrics::FanoutMetrics;
use crate::{hot, warm};

/// Per-tier result of one fan-out
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FanoutOutcome {
    pub hot_ok: bool,
    pub warm_ok: bool,
    pub cold_ok: bool,
    /// Whether the reading was also written to the error location
    pub error_archived: bool,
    pub latency_ms: u64,
}

impl FanoutOutcome {
    /// True when every tier succeeded
    pub fn is_complete(&self) -> bool {
        self.hot_ok && self.warm_ok && self.cold_ok
    }
}

/// Executes the per-reading storage fan-out
pub struct StorageFanout {
    cold: ColdStore,
    metrics: Arc<FanoutMetrics>,
}

impl StorageFanout {
    /// Create a fan-out over the given cold store
    pub fn new(cold: ColdStore) -> Self {
        Self {
            cold,
            metrics: Arc::new(FanoutMetrics::new()),
        }
    }

    /// Shared metrics handle
    pub fn metrics(&self) -> Arc<FanoutMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Persist one reading to all three tiers
    pub async fn store(
        &self,
        reading: &SensorReading,
        ctx: &TenantContext,
        plane: &DataPlane,
    ) -> FanoutOutcome {
        let started = Instant::now();
        let tenant_id = ctx.tenant_id.as_str();

        let (hot_result, warm_result, cold_result) = tokio::join!(
            hot::write(&plane.hot, reading, tenant_id),
            warm::upsert_status(&plane.warm, reading, tenant_id),
            self.cold.archive(&plane.object, reading, tenant_id),
        );

        let hot_ok = log_tier("hot", reading, hot_result.err());
        let warm_ok = log_tier("warm", reading, warm_result.err());
        let cold_ok = log_tier("cold", reading, cold_result.err());

        if !hot_ok {
            self.metrics.hot_failure();
        }
        if !warm_ok {
            self.metrics.warm_failure();
        }
        if !cold_ok {
            self.metrics.cold_failure();
        }

        let mut error_archived = false;
        if !(hot_ok && warm_ok && cold_ok) {
            match self
                .cold
                .archive_error(&plane.object, reading, tenant_id)
                .await
            {
                Ok(_) => {
                    self.metrics.error_archived();
                    error_archived = true;
                }
                Err(e) => {
                    tracing::error!(
                        equipment_id = %reading.equipment_id,
                        tenant_id = %tenant_id,
                        error = %e,
                        "error-location archive failed, reading only in logs"
                    );
                }
            }
        } else {
            self.metrics.reading_stored();
        }

        FanoutOutcome {
            hot_ok,
            warm_ok,
            cold_ok,
            error_archived,
            latency_ms: started.elapsed().as_millis() as u64,
        }
    }
}

fn log_tier<E: std::fmt::Display>(
    tier: &'static str,
    reading: &SensorReading,
    error: Option<E>,
) -> bool {
    match error {
        None => true,
        Some(e) => {
            tracing::warn!(
                tier,
                equipment_id = %reading.equipment_id,
                error = %e,
                "storage tier write failed"
            );
            false
        }
    }
}
