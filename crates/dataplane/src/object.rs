//! Cold-tier object targets

use foundry_tenant::TenantContext;
use serde::Serialize;

/// Where a tenant's objects land: a bucket and a key prefix
#[derive(Debug, Clone, Serialize)]
pub struct ObjectTarget {
    pub bucket: String,
    /// Key prefix, empty or ending in `/`
    pub prefix: String,
}

impl ObjectTarget {
    /// Derive the target for a tenant
    ///
    /// Isolated tenants with a dedicated bucket write at the bucket root;
    /// everyone else shares the platform bucket under `tenants/<id>/`.
    pub fn for_tenant(ctx: &TenantContext, shared_bucket: &str) -> Self {
        match ctx.object.dedicated_bucket {
            Some(ref bucket) => Self {
                bucket: bucket.clone(),
                prefix: String::new(),
            },
            None => Self {
                bucket: shared_bucket.to_string(),
                prefix: format!("tenants/{}/", ctx.tenant_id),
            },
        }
    }

    /// Join a relative key onto this target's prefix
    pub fn key(&self, relative: &str) -> String {
        format!("{}{}", self.prefix, relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundry_tenant::test_utils::{isolated_tenant, shared_tenant};

    #[test]
    fn test_shared_tenant_uses_platform_bucket() {
        let target = ObjectTarget::for_tenant(&shared_tenant("acme-corp"), "foundry-telemetry");
        assert_eq!(target.bucket, "foundry-telemetry");
        assert_eq!(target.prefix, "tenants/acme-corp/");
        assert_eq!(target.key("a/b.json"), "tenants/acme-corp/a/b.json");
    }

    #[test]
    fn test_isolated_tenant_uses_dedicated_bucket() {
        let target = ObjectTarget::for_tenant(&isolated_tenant("globex"), "foundry-telemetry");
        assert_eq!(target.bucket, "globex-telemetry");
        assert_eq!(target.prefix, "");
        assert_eq!(target.key("a/b.json"), "a/b.json");
    }
}
