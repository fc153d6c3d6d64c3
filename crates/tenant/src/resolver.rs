//! Tenant resolver
//!
//! Front door of the tenant directory: extract an identifier from the
//! request, consult the cache (loading through the directory on a miss),
//! then enforce the tenant's access policy.

use std::sync::Arc;

use crate::cache::TenantCache;
use crate::context::TenantContext;
use crate::directory::TenantDirectory;
use crate::error::Result;
use crate::extract::{RequestMeta, extract_tenant_id};
use crate::policy::AccessPolicy;
use crate::TenantError;

/// Resolves requests to read-only tenant context views
pub struct TenantResolver {
    directory: Arc<dyn TenantDirectory>,
    cache: TenantCache,
    policy: AccessPolicy,
    platform_domain: String,
}

impl TenantResolver {
    /// Create a resolver over the given directory
    pub fn new(
        directory: Arc<dyn TenantDirectory>,
        platform_domain: impl Into<String>,
        process_region: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            cache: TenantCache::new(),
            policy: AccessPolicy::new(process_region),
            platform_domain: platform_domain.into(),
        }
    }

    /// Replace the cache (custom TTL for tests)
    pub fn with_cache(mut self, cache: TenantCache) -> Self {
        self.cache = cache;
        self
    }

    /// Resolve a request to its tenant context
    ///
    /// # Errors
    ///
    /// - [`TenantError::Missing`] - no identifier in any recognized location
    /// - [`TenantError::Unknown`] - identifier not in the directory
    /// - [`TenantError::Denied`] - compliance or rate-limit rejection
    pub async fn resolve(&self, meta: &RequestMeta) -> Result<Arc<TenantContext>> {
        let tenant_id =
            extract_tenant_id(meta, &self.platform_domain).ok_or(TenantError::Missing)?;

        let ctx = self.cache.get_or_load(&tenant_id, &self.directory).await?;

        self.policy.check(&ctx, meta.source_region.as_deref())?;

        tracing::debug!(
            tenant_id = %ctx.tenant_id,
            deployment_mode = ?ctx.deployment_mode,
            "tenant resolved"
        );

        Ok(ctx)
    }

    /// Drop a tenant's cached context (directory update signal)
    pub fn invalidate(&self, tenant_id: &str) {
        self.cache.invalidate(tenant_id);
    }
}
