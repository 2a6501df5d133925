//! Send counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Atomic counters updated by every send attempt.
#[derive(Debug, Default)]
pub struct SendMetrics {
    attempts: AtomicU64,
    delivered: AtomicU64,
    provider_failures: AtomicU64,
    errors: AtomicU64,
    total_latency_ms: AtomicU64,
}

/// Point-in-time copy of [`SendMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Sends started.
    pub attempts: u64,
    /// Sends the provider accepted.
    pub delivered: u64,
    /// Sends the provider rejected.
    pub provider_failures: u64,
    /// Sends that failed before a decodable response (hook, transport, decode).
    pub errors: u64,
    /// Sum of request latencies in milliseconds.
    pub total_latency_ms: u64,
}

impl MetricsSnapshot {
    /// Average latency of completed requests, in milliseconds.
    pub fn average_latency_ms(&self) -> f64 {
        let completed = self.delivered + self.provider_failures;
        if completed == 0 {
            0.0
        } else {
            self.total_latency_ms as f64 / completed as f64
        }
    }
}

impl SendMetrics {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the start of a send.
    pub fn record_attempt(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an accepted send.
    pub fn record_delivered(&self, latency: Duration) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
        self.record_latency(latency);
    }

    /// Records a provider-reported failure.
    pub fn record_provider_failure(&self, latency: Duration) {
        self.provider_failures.fetch_add(1, Ordering::Relaxed);
        self.record_latency(latency);
    }

    /// Records a hook, transport or decode error.
    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    fn record_latency(&self, latency: Duration) {
        let ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.total_latency_ms.fetch_add(ms, Ordering::Relaxed);
    }

    /// Returns a snapshot of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            attempts: self.attempts.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            provider_failures: self.provider_failures.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            total_latency_ms: self.total_latency_ms.load(Ordering::Relaxed),
        }
    }

    /// Resets all counters.
    pub fn reset(&self) {
        self.attempts.store(0, Ordering::Relaxed);
        self.delivered.store(0, Ordering::Relaxed);
        self.provider_failures.store(0, Ordering::Relaxed);
        self.errors.store(0, Ordering::Relaxed);
        self.total_latency_ms.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = SendMetrics::new();
        metrics.record_attempt();
        metrics.record_attempt();
        metrics.record_attempt();
        metrics.record_delivered(Duration::from_millis(40));
        metrics.record_provider_failure(Duration::from_millis(20));
        metrics.record_error();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.attempts, 3);
        assert_eq!(snapshot.delivered, 1);
        assert_eq!(snapshot.provider_failures, 1);
        assert_eq!(snapshot.errors, 1);
        assert_eq!(snapshot.total_latency_ms, 60);
        assert!((snapshot.average_latency_ms() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset() {
        let metrics = SendMetrics::new();
        metrics.record_attempt();
        metrics.record_error();
        metrics.reset();

        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
        assert_eq!(metrics.snapshot().average_latency_ms(), 0.0);
    }
}
