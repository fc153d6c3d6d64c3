//! Ingestion metrics
//!
//! Process-level counters exposed at `/ops/metrics`.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for the ingestion surface
#[derive(Debug, Default)]
pub struct IngestMetrics {
    pub requests_received: AtomicU64,
    pub readings_accepted: AtomicU64,
    pub validation_failures: AtomicU64,
    pub tenant_rejections: AtomicU64,
    pub anomalies_detected: AtomicU64,
    pub alerts_created: AtomicU64,
    pub sla_breaches: AtomicU64,
}

impl IngestMetrics {
    /// Create a zeroed metrics instance
    pub const fn new() -> Self {
        Self {
            requests_received: AtomicU64::new(0),
            readings_accepted: AtomicU64::new(0),
            validation_failures: AtomicU64::new(0),
            tenant_rejections: AtomicU64::new(0),
            anomalies_detected: AtomicU64::new(0),
            alerts_created: AtomicU64::new(0),
            sla_breaches: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn request_received(&self) {
        self.requests_received.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn reading_accepted(&self) {
        self.readings_accepted.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn validation_failure(&self) {
        self.validation_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn tenant_rejection(&self) {
        self.tenant_rejections.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn anomalies(&self, count: u64) {
        self.anomalies_detected.fetch_add(count, Ordering::Relaxed);
    }

    #[inline]
    pub fn alerts(&self, count: u64) {
        self.alerts_created.fetch_add(count, Ordering::Relaxed);
    }

    #[inline]
    pub fn sla_breach(&self) {
        self.sla_breaches.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time snapshot
    pub fn snapshot(&self) -> IngestSnapshot {
        IngestSnapshot {
            requests_received: self.requests_received.load(Ordering::Relaxed),
            readings_accepted: self.readings_accepted.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            tenant_rejections: self.tenant_rejections.load(Ordering::Relaxed),
            anomalies_detected: self.anomalies_detected.load(Ordering::Relaxed),
            alerts_created: self.alerts_created.load(Ordering::Relaxed),
            sla_breaches: self.sla_breaches.load(Ordering::Relaxed),
        }
    }
}

/// Copyable snapshot of [`IngestMetrics`]
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct IngestSnapshot {
    pub requests_received: u64,
    pub readings_accepted: u64,
    pub validation_failures: u64,
    pub tenant_rejections: u64,
    pub anomalies_detected: u64,
    pub alerts_created: u64,
    pub sla_breaches: u64,
}
