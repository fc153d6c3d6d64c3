//! Tenant context cache
//!
//! Process-wide map of resolved tenant contexts keyed by tenant id. Entries
//! expire a fixed interval after insertion. Concurrent misses for the same
//! tenant are collapsed into a single directory load: the first caller
//! installs a shared in-flight future, later callers await the same future.
//!
//! Eviction is safe against in-flight readers because callers hold
//! `Arc<TenantContext>` views; dropping a slot never invalidates a view
//! already handed out.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

use crate::context::TenantContext;
use crate::directory::TenantDirectory;
use crate::error::Result;

/// Default entry lifetime
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

type LoadFuture = Shared<BoxFuture<'static, Result<Arc<TenantContext>>>>;

enum Slot {
    /// A resolved context and its insertion time
    Ready {
        ctx: Arc<TenantContext>,
        inserted_at: Instant,
    },
    /// A directory load in flight; clones of the future share one load
    Loading(LoadFuture),
}

/// TTL cache with single-flight loading
pub struct TenantCache {
    ttl: Duration,
    slots: Mutex<HashMap<String, Slot>>,
}

impl TenantCache {
    /// Create a cache with the default 300 s TTL
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Create a cache with a custom TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Get a cached context, or load it through the directory
    ///
    /// The lock is never held across an await; the in-flight future is
    /// cloned out of the map and awaited outside the critical section.
    pub async fn get_or_load(
        &self,
        tenant_id: &str,
        directory: &Arc<dyn TenantDirectory>,
    ) -> Result<Arc<TenantContext>> {
        let fut = {
            let mut slots = self.slots.lock();
            match slots.get(tenant_id) {
                Some(Slot::Ready { ctx, inserted_at }) if inserted_at.elapsed() < self.ttl => {
                    return Ok(Arc::clone(ctx));
                }
                Some(Slot::Loading(fut)) => fut.clone(),
                _ => {
                    let dir = Arc::clone(directory);
                    let id = tenant_id.to_string();
                    let fut: LoadFuture =
                        async move { dir.load(&id).await.map(Arc::new) }.boxed().shared();
                    slots.insert(tenant_id.to_string(), Slot::Loading(fut.clone()));
                    fut
                }
            }
        };

        let result = fut.await;

        let mut slots = self.slots.lock();
        let still_loading = matches!(slots.get(tenant_id), Some(Slot::Loading(_)));
        if still_loading {
            match &result {
                Ok(ctx) => {
                    slots.insert(
                        tenant_id.to_string(),
                        Slot::Ready {
                            ctx: Arc::clone(ctx),
                            inserted_at: Instant::now(),
                        },
                    );
                }
                Err(_) => {
                    slots.remove(tenant_id);
                }
            }
        }

        result
    }

    /// Drop a tenant's entry (directory update signal)
    pub fn invalidate(&self, tenant_id: &str) {
        self.slots.lock().remove(tenant_id);
    }

    /// Drop every expired entry
    pub fn purge_expired(&self) {
        let mut slots = self.slots.lock();
        let ttl = self.ttl;
        slots.retain(|_, slot| match slot {
            Slot::Ready { inserted_at, .. } => inserted_at.elapsed() < ttl,
            Slot::Loading(_) => true,
        });
    }

    /// Number of live slots (including in-flight loads)
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TenantCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;
