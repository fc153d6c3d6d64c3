//! Cache tests: hits, expiry, single-flight collapsing

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::TenantCache;
use crate::context::TenantContext;
use crate::directory::TenantDirectory;
use crate::error::{Result, TenantError};
use crate::test_utils::shared_tenant;

/// Directory that counts loads and optionally delays them
struct CountingDirectory {
    loads: AtomicUsize,
    delay: Duration,
}

impl CountingDirectory {
    fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            loads: AtomicUsize::new(0),
            delay,
        })
    }

    fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TenantDirectory for CountingDirectory {
    async fn load(&self, tenant_id: &str) -> Result<TenantContext> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if tenant_id == "missing" {
            return Err(TenantError::Unknown(tenant_id.to_string()));
        }
        Ok(shared_tenant(tenant_id))
    }
}

fn as_directory(dir: &Arc<CountingDirectory>) -> Arc<dyn TenantDirectory> {
    Arc::clone(dir) as Arc<dyn TenantDirectory>
}

#[tokio::test]
async fn test_second_lookup_is_a_hit() {
    let counting = CountingDirectory::new(Duration::ZERO);
    let dir = as_directory(&counting);
    let cache = TenantCache::new();

    let a = cache.get_or_load("acme-corp", &dir).await.unwrap();
    let b = cache.get_or_load("acme-corp", &dir).await.unwrap();

    assert_eq!(a.tenant_id, b.tenant_id);
    assert_eq!(counting.load_count(), 1);
}

#[tokio::test]
async fn test_entry_expires_after_ttl() {
    let counting = CountingDirectory::new(Duration::ZERO);
    let dir = as_directory(&counting);
    let cache = TenantCache::with_ttl(Duration::from_millis(20));

    cache.get_or_load("acme-corp", &dir).await.unwrap();
    tokio::time::sleep(Duration::from_millis(40)).await;
    cache.get_or_load("acme-corp", &dir).await.unwrap();

    assert_eq!(counting.load_count(), 2);
}

#[tokio::test]
async fn test_concurrent_misses_share_one_load() {
    let counting = CountingDirectory::new(Duration::from_millis(50));
    let dir = as_directory(&counting);
    let cache = Arc::new(TenantCache::new());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let cache = Arc::clone(&cache);
        let dir = Arc::clone(&dir);
        handles.push(tokio::spawn(async move {
            cache.get_or_load("acme-corp", &dir).await
        }));
    }

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }
    assert_eq!(counting.load_count(), 1);
}

#[tokio::test]
async fn test_failed_load_is_not_cached() {
    let counting = CountingDirectory::new(Duration::ZERO);
    let dir = as_directory(&counting);
    let cache = TenantCache::new();

    assert!(cache.get_or_load("missing", &dir).await.is_err());
    assert!(cache.get_or_load("missing", &dir).await.is_err());

    // Both attempts reached the directory - errors do not stick
    assert_eq!(counting.load_count(), 2);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_invalidate_forces_reload() {
    let counting = CountingDirectory::new(Duration::ZERO);
    let dir = as_directory(&counting);
    let cache = TenantCache::new();

    cache.get_or_load("acme-corp", &dir).await.unwrap();
    cache.invalidate("acme-corp");
    cache.get_or_load("acme-corp", &dir).await.unwrap();

    assert_eq!(counting.load_count(), 2);
}
