//! Tenant directory backends
//!
//! The directory is the authoritative source of tenant records. Production
//! deployments back it with the platform control plane; development and
//! tests use [`StaticDirectory`] seeded from a JSON file.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;

use crate::context::TenantContext;
use crate::error::{Result, TenantError};

/// Source of tenant records
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Load the record for `tenant_id`
    ///
    /// Returns [`TenantError::Unknown`] when the directory has no such
    /// tenant. Implementations must return validated records (see
    /// [`TenantContext::validate`]).
    async fn load(&self, tenant_id: &str) -> Result<TenantContext>;
}

/// In-memory directory seeded at startup
///
/// Records are validated on insertion so a malformed seed file fails the
/// process at boot rather than the first request.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    tenants: HashMap<String, TenantContext>,
}

impl StaticDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any existing one for the same tenant
    pub fn insert(&mut self, ctx: TenantContext) {
        self.tenants.insert(ctx.tenant_id.clone(), ctx);
    }

    /// Number of seeded tenants
    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    /// Whether the directory is empty
    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }

    /// Load a directory from a JSON seed file (an array of tenant records)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            TenantError::directory(format!("cannot read seed file '{}': {e}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    /// Parse a directory from a JSON array of tenant records
    pub fn from_json(raw: &str) -> Result<Self> {
        let records: Vec<TenantContext> = serde_json::from_str(raw)
            .map_err(|e| TenantError::directory(format!("malformed tenant seed: {e}")))?;

        let mut dir = Self::new();
        for ctx in records {
            ctx.validate()?;
            dir.insert(ctx);
        }
        Ok(dir)
    }
}

#[async_trait]
impl TenantDirectory for StaticDirectory {
    async fn load(&self, tenant_id: &str) -> Result<TenantContext> {
        let ctx = self
            .tenants
            .get(tenant_id)
            .cloned()
            .ok_or_else(|| TenantError::Unknown(tenant_id.to_string()))?;
        ctx.validate()?;
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fixture_directory, shared_tenant};

    #[tokio::test]
    async fn test_load_known_tenant() {
        let dir = fixture_directory();
        let ctx = dir.load("acme-corp").await.unwrap();
        assert_eq!(ctx.tenant_id, "acme-corp");
    }

    #[tokio::test]
    async fn test_load_unknown_tenant() {
        let dir = fixture_directory();
        let err = dir.load("nonesuch").await.unwrap_err();
        assert!(matches!(err, TenantError::Unknown(id) if id == "nonesuch"));
    }

    #[test]
    fn test_from_json_round_trip() {
        let seed = serde_json::to_string(&vec![shared_tenant("acme-corp")]).unwrap();
        let dir = StaticDirectory::from_json(&seed).unwrap();
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn test_from_json_rejects_invalid_record() {
        let mut bad = shared_tenant("acme-corp");
        bad.data.row_level_security = false;
        let seed = serde_json::to_string(&vec![bad]).unwrap();
        assert!(StaticDirectory::from_json(&seed).is_err());
    }
}
