//! Data-plane selection
//!
//! Maps a tenant context to the concrete resources a request must use:
//! pool handles, the cold-tier target, topic names, and alert sinks. The
//! decision is pure given the context and a usage sample; the only side
//! effect is lazy creation of dedicated pools.

use std::sync::Arc;

use foundry_tenant::{DeploymentMode, TenantContext, TenantTier};

use crate::error::{DataPlaneError, Result};
use crate::object::ObjectTarget;
use crate::pool::{PoolHandle, PoolSet};
use crate::topics::StreamTopics;
use crate::usage::{TenantUsage, UsageStats};

/// Daily volume beyond which an isolated tenant gets a dedicated pool (GB)
pub const PROMOTION_DAILY_VOLUME_GB: f64 = 100.0;

/// Query rate beyond which an isolated tenant gets a dedicated pool
pub const PROMOTION_QPS: f64 = 50.0;

/// SLA violation count beyond which an isolated tenant gets a dedicated pool
pub const PROMOTION_SLA_VIOLATIONS: u32 = 5;

/// Notification sinks configured for a tenant
#[derive(Debug, Clone)]
pub struct AlertSinks {
    pub notification_topics: Vec<String>,
    pub webhook_urls: Vec<String>,
}

/// The concrete resources one request operates on
#[derive(Clone)]
pub struct DataPlane {
    pub hot: PoolHandle,
    pub warm: PoolHandle,
    pub object: ObjectTarget,
    pub topics: StreamTopics,
    pub alert_sinks: AlertSinks,
}

/// Selects per-request data-plane resources from tenant identity
pub struct DataPlaneSelector {
    pools: Arc<PoolSet>,
    usage: Arc<dyn UsageStats>,
    shared_bucket: String,
}

impl DataPlaneSelector {
    /// Create a selector over the process pool inventory
    pub fn new(pools: Arc<PoolSet>, usage: Arc<dyn UsageStats>, shared_bucket: impl Into<String>) -> Self {
        Self {
            pools,
            usage,
            shared_bucket: shared_bucket.into(),
        }
    }

    /// Select the data plane for a tenant
    pub fn select(&self, ctx: &TenantContext) -> Result<DataPlane> {
        let hot = self.select_hot(ctx)?;
        let warm = self.select_warm(ctx);

        Ok(DataPlane {
            hot,
            warm,
            object: ObjectTarget::for_tenant(ctx, &self.shared_bucket),
            topics: StreamTopics::for_tenant(&ctx.tenant_id, ctx.deployment_mode),
            alert_sinks: AlertSinks {
                notification_topics: ctx.alerts.notification_topics.clone(),
                webhook_urls: ctx.alerts.webhook_urls.clone(),
            },
        })
    }

    /// Hot tier: dedicated pool for isolated tenants that cross a
    /// promotion threshold; everyone else rides the shared pool
    ///
    /// Every shared-pool handle carries the tenant session scope - a
    /// borrowed shared connection must have `current_tenant_id` set before
    /// use no matter the deployment mode. Only a tenant's own dedicated
    /// pool runs unscoped.
    fn select_hot(&self, ctx: &TenantContext) -> Result<PoolHandle> {
        match ctx.deployment_mode {
            DeploymentMode::Shared | DeploymentMode::Mixed => Ok(PoolHandle::scoped(
                self.pools.shared_hot(),
                ctx.tenant_id.clone(),
            )),
            DeploymentMode::Isolated => {
                let usage = self.usage.sample(&ctx.tenant_id);
                if should_promote(ctx, &usage) {
                    let url = ctx.data.connection_string.as_deref().ok_or_else(|| {
                        DataPlaneError::unusable(
                            &ctx.tenant_id,
                            "isolated tenant without dedicated connection string",
                        )
                    })?;
                    let pool = self.pools.dedicated_hot(&ctx.tenant_id, url)?;
                    Ok(PoolHandle::unscoped(pool))
                } else {
                    // Promote on demand: low-volume isolated tenants stay
                    // on the shared pool, scoped like every other borrower
                    Ok(PoolHandle::scoped(
                        self.pools.shared_hot(),
                        ctx.tenant_id.clone(),
                    ))
                }
            }
        }
    }

    /// Warm tier: always the shared pool, always tenant-scoped
    ///
    /// Per-equipment snapshots are low-volume transactional data; dedicating
    /// warm pools per tenant is cost without benefit.
    fn select_warm(&self, ctx: &TenantContext) -> PoolHandle {
        PoolHandle::scoped(self.pools.shared_warm(), ctx.tenant_id.clone())
    }
}

/// Whether an isolated tenant's load justifies a dedicated hot pool
pub fn should_promote(ctx: &TenantContext, usage: &TenantUsage) -> bool {
    usage.daily_volume_gb > PROMOTION_DAILY_VOLUME_GB
        || usage.avg_queries_per_sec > PROMOTION_QPS
        || usage.recent_sla_violations > PROMOTION_SLA_VIOLATIONS
        || ctx.tier == TenantTier::Enterprise
}

#[cfg(test)]
#[path = "selector_test.rs"]
mod selector_test;
