//! Foundry Tenant Directory
//!
//! Resolves inbound requests to tenant contexts and enforces per-tenant
//! access policy.
//!
//! # Flow
//!
//! ```text
//! RequestMeta ──> extract (5-source fallback chain)
//!                   └──> cache (300 s TTL, single-flight miss)
//!                          └──> directory (control plane / static seed)
//!                                 └──> policy (compliance + hourly rate)
//! ```
//!
//! Callers receive `Arc<TenantContext>` read-only views; the cache owns the
//! contexts and eviction never invalidates a view already handed out.

mod cache;
mod context;
mod directory;
mod error;
mod extract;
mod policy;
mod resolver;

pub mod test_utils;

pub use cache::{DEFAULT_TTL, TenantCache};
pub use context::{
    AlertConfig, DataConfig, DeploymentMode, EscalationRule, FeatureConfig, ObjectConfig,
    TenantContext, TenantTier,
};
pub use directory::{StaticDirectory, TenantDirectory};
pub use error::{Result, TenantError};
pub use extract::{RequestMeta, extract_tenant_id};
pub use policy::{AccessPolicy, REGION_RESTRICTED_TAG};
pub use resolver::TenantResolver;
