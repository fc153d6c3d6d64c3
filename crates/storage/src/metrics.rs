//! Fan-out metrics

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by the fan-out and its background pool
#[derive(Debug, Default)]
pub struct FanoutMetrics {
    /// Readings that completed all three tiers
    pub readings_stored: AtomicU64,

    /// Per-tier failures
    pub hot_failures: AtomicU64,
    pub warm_failures: AtomicU64,
    pub cold_failures: AtomicU64,

    /// Readings archived to the error location
    pub error_archives: AtomicU64,

    /// Jobs dropped because the background pool was full
    pub jobs_dropped: AtomicU64,
}

impl FanoutMetrics {
    /// Create a zeroed metrics instance
    pub const fn new() -> Self {
        Self {
            readings_stored: AtomicU64::new(0),
            hot_failures: AtomicU64::new(0),
            warm_failures: AtomicU64::new(0),
            cold_failures: AtomicU64::new(0),
            error_archives: AtomicU64::new(0),
            jobs_dropped: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn reading_stored(&self) {
        self.readings_stored.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn hot_failure(&self) {
        self.hot_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn warm_failure(&self) {
        self.warm_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn cold_failure(&self) {
        self.cold_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn error_archived(&self) {
        self.error_archives.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn job_dropped(&self) {
        self.jobs_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time snapshot
    pub fn snapshot(&self) -> FanoutSnapshot {
        FanoutSnapshot {
            readings_stored: self.readings_stored.load(Ordering::Relaxed),
            hot_failures: self.hot_failures.load(Ordering::Relaxed),
            warm_failures: self.warm_failures.load(Ordering::Relaxed),
            cold_failures: self.cold_failures.load(Ordering::Relaxed),
            error_archives: self.error_archives.load(Ordering::Relaxed),
            jobs_dropped: self.jobs_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Copyable snapshot of [`FanoutMetrics`]
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct FanoutSnapshot {
    pub readings_stored: u64,
    pub hot_failures: u64,
    pub warm_failures: u64,
    pub cold_failures: u64,
    pub error_archives: u64,
    pub jobs_dropped: u64,
}
