//! Foundry Data-Plane Selector
//!
//! Given a tenant context, selects the concrete connection pools, cold-tier
//! target, stream topics, and alert sinks a request must use.
//!
//! # Tenant isolation discipline
//!
//! Isolation on the shared pools is enforced by row-level security keyed
//! off the `app.current_tenant_id` session variable, so every connection
//! borrowed from a shared pool must carry the borrowing tenant's scope -
//! whatever the tenant's deployment mode. [`PoolHandle`] owns that
//! discipline: scoped handles set the variable on every acquisition,
//! unscoped handles (dedicated pools only) reset it, so session state can
//! never leak between tenants through connection reuse.

mod error;
mod object;
mod pool;
mod selector;
mod topics;
mod usage;

pub use error::{DataPlaneError, Result};
pub use object::ObjectTarget;
pub use pool::{PoolHandle, PoolSet, TENANT_SESSION_VAR};
pub use selector::{
    AlertSinks, DataPlane, DataPlaneSelector, PROMOTION_DAILY_VOLUME_GB, PROMOTION_QPS,
    PROMOTION_SLA_VIOLATIONS, should_promote,
};
pub use topics::{PRIORITY_ALERT_TOPIC, SHARED_TOPIC, StreamTopics};
pub use usage::{FixedUsageStats, NullUsageStats, TenantUsage, UsageStats};
