//! Observability stubs (metrics, tracing)

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics handle for recording counters/gauges
#[derive(Debug, Default)]
pub struct Metrics {
    workflows_started: AtomicU64,
    workflows_completed: AtomicU64,
    workflows_failed: AtomicU64,
    homepages_generated: AtomicU64,
    screenshots_captured: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn workflow_started(&self) {
        self.workflows_started.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "workflows_started", "Metric incremented");
    }

    pub fn workflow_completed(&self) {
        self.workflows_completed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "workflows_completed", "Metric incremented");
    }

    pub fn workflow_failed(&self) {
        self.workflows_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "workflows_failed", "Metric incremented");
    }

    pub fn homepage_generated(&self) {
        self.homepages_generated.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "homepages_generated", "Metric incremented");
    }

    pub fn screenshot_captured(&self) {
        self.screenshots_captured.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "screenshots_captured", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            workflows_started: self.workflows_started.load(Ordering::Relaxed),
            workflows_completed: self.workflows_completed.load(Ordering::Relaxed),
            workflows_failed: self.workflows_failed.load(Ordering::Relaxed),
            homepages_generated: self.homepages_generated.load(Ordering::Relaxed),
            screenshots_captured: self.screenshots_captured.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub workflows_started: u64,
    pub workflows_completed: u64,
    pub workflows_failed: u64,
    pub homepages_generated: u64,
    pub screenshots_captured: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_increments() {
        let metrics = Metrics::new();
        metrics.workflow_started();
        metrics.workflow_started();
        metrics.workflow_completed();
        metrics.homepage_generated();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.workflows_started, 2);
        assert_eq!(snapshot.workflows_completed, 1);
        assert_eq!(snapshot.workflows_failed, 0);
        assert_eq!(snapshot.homepages_generated, 1);
        assert_eq!(snapshot.screenshots_captured, 0);
    }
}
