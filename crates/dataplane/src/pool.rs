//! Tenant-scoped connection pools
//!
//! In shared deployment mode every row-level-security decision hangs off
//! the `app.current_tenant_id` session variable, so a borrowed connection
//! must never carry another tenant's value. [`PoolHandle::acquire`]
//! guarantees that: a scoped handle sets the variable on every acquisition,
//! an unscoped handle resets it. Session state left by a previous borrower
//! cannot survive into the next query.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::RwLock;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::pool::PoolConnection;
use sqlx::{Executor, Postgres};

use crate::error::{DataPlaneError, Result};

/// Session variable carrying the tenant for row-level security
pub const TENANT_SESSION_VAR: &str = "app.current_tenant_id";

/// A pool plus the tenant scope its connections must carry
#[derive(Clone)]
pub struct PoolHandle {
    pool: PgPool,
    tenant_scope: Option<String>,
}

impl PoolHandle {
    /// A handle whose connections are scoped to `tenant_id`
    pub fn scoped(pool: PgPool, tenant_id: impl Into<String>) -> Self {
        Self {
            pool,
            tenant_scope: Some(tenant_id.into()),
        }
    }

    /// A handle without session scoping (dedicated pools)
    pub fn unscoped(pool: PgPool) -> Self {
        Self {
            pool,
            tenant_scope: None,
        }
    }

    /// The tenant this handle scopes sessions to, if any
    pub fn tenant_scope(&self) -> Option<&str> {
        self.tenant_scope.as_deref()
    }

    /// The underlying pool (schema initialization only)
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Borrow a connection with the session variable in a known state
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>> {
        let mut conn = self.pool.acquire().await.map_err(DataPlaneError::Acquire)?;

        match &self.tenant_scope {
            Some(tenant_id) => {
                sqlx::query("SELECT set_config($1, $2, false)")
                    .bind(TENANT_SESSION_VAR)
                    .bind(tenant_id)
                    .execute(&mut *conn)
                    .await
                    .map_err(|e| DataPlaneError::SessionScope {
                        tenant_id: tenant_id.clone(),
                        source: e,
                    })?;
            }
            None => {
                // Clear whatever the previous borrower set
                conn.execute("RESET app.current_tenant_id")
                    .await
                    .map_err(DataPlaneError::Acquire)?;
            }
        }

        Ok(conn)
    }
}

/// The process's pool inventory: two shared pools plus dedicated hot pools
/// keyed by tenant id
pub struct PoolSet {
    shared_hot: PgPool,
    shared_warm: PgPool,
    dedicated_hot: RwLock<HashMap<String, PgPool>>,
    dedicated_max_connections: u32,
}

impl PoolSet {
    /// Build the shared pools from their connection URLs
    ///
    /// Pools are created lazily - no connection is attempted until first
    /// use, so construction cannot block startup on an unreachable store.
    pub fn new(
        shared_hot_url: &str,
        hot_max: u32,
        hot_acquire_timeout: Duration,
        shared_warm_url: &str,
        warm_max: u32,
        warm_acquire_timeout: Duration,
        dedicated_max_connections: u32,
    ) -> Result<Self> {
        let shared_hot = PgPoolOptions::new()
            .max_connections(hot_max)
            .acquire_timeout(hot_acquire_timeout)
            .connect_lazy(shared_hot_url)
            .map_err(|e| DataPlaneError::pool_create("shared-hot", e.to_string()))?;

        let shared_warm = PgPoolOptions::new()
            .max_connections(warm_max)
            .acquire_timeout(warm_acquire_timeout)
            .connect_lazy(shared_warm_url)
            .map_err(|e| DataPlaneError::pool_create("shared-warm", e.to_string()))?;

        Ok(Self {
            shared_hot,
            shared_warm,
            dedicated_hot: RwLock::new(HashMap::new()),
            dedicated_max_connections,
        })
    }

    /// The shared hot pool
    pub fn shared_hot(&self) -> PgPool {
        self.shared_hot.clone()
    }

    /// The shared warm pool
    pub fn shared_warm(&self) -> PgPool {
        self.shared_warm.clone()
    }

    /// Get or lazily create the dedicated hot pool for a tenant
    pub fn dedicated_hot(&self, tenant_id: &str, connection_url: &str) -> Result<PgPool> {
        if let Some(pool) = self.dedicated_hot.read().get(tenant_id) {
            return Ok(pool.clone());
        }

        let mut pools = self.dedicated_hot.write();
        // Double-checked: another request may have created it meanwhile
        if let Some(pool) = pools.get(tenant_id) {
            return Ok(pool.clone());
        }

        let pool = PgPoolOptions::new()
            .max_connections(self.dedicated_max_connections)
            .acquire_timeout(Duration::from_millis(1000))
            .connect_lazy(connection_url)
            .map_err(|e| DataPlaneError::pool_create(tenant_id, e.to_string()))?;

        tracing::info!(tenant_id = %tenant_id, "dedicated hot pool created");
        pools.insert(tenant_id.to_string(), pool.clone());
        Ok(pool)
    }

    /// Number of dedicated pools currently alive
    pub fn dedicated_count(&self) -> usize {
        self.dedicated_hot.read().len()
    }

    /// Close every pool (process shutdown)
    pub async fn close(&self) {
        self.shared_hot.close().await;
        self.shared_warm.close().await;
        let pools: Vec<PgPool> = self.dedicated_hot.read().values().cloned().collect();
        for pool in pools {
            pool.close().await;
        }
    }
}
