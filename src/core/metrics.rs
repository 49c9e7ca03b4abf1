//! Request counters owned by the process and injected into clients

use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// How a single request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Success,
    Failure,
    Cancelled,
}

/// Running counters for REST traffic.
///
/// Create one with [`ClientMetrics::init`] at startup and hand the `Arc` to
/// every `RestClient`. Tests create their own instance, so counts never leak
/// between them.
#[derive(Debug, Default)]
pub struct ClientMetrics {
    requests: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
    cancelled: AtomicU64,
    total_latency_us: AtomicU64,
}

/// Point-in-time copy of [`ClientMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub successes: u64,
    pub failures: u64,
    pub cancelled: u64,
    pub total_latency_us: u64,
}

impl MetricsSnapshot {
    /// Mean latency of completed requests
    pub fn average_latency(&self) -> Option<Duration> {
        let completed = self.successes + self.failures;
        (completed > 0).then(|| Duration::from_micros(self.total_latency_us / completed))
    }
}

impl ClientMetrics {
    pub fn init() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Zero every counter
    pub fn reset(&self) {
        self.requests.store(0, Ordering::Relaxed);
        self.successes.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
        self.cancelled.store(0, Ordering::Relaxed);
        self.total_latency_us.store(0, Ordering::Relaxed);
    }

    pub fn record(&self, outcome: RequestOutcome, latency: Duration) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        match outcome {
            RequestOutcome::Success => {
                self.successes.fetch_add(1, Ordering::Relaxed);
            }
            RequestOutcome::Failure => {
                self.failures.fetch_add(1, Ordering::Relaxed);
            }
            RequestOutcome::Cancelled => {
                self.cancelled.fetch_add(1, Ordering::Relaxed);
                return;
            }
        }
        let micros = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX);
        self.total_latency_us.fetch_add(micros, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            total_latency_us: self.total_latency_us.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_snapshot() {
        let metrics = ClientMetrics::init();
        metrics.record(RequestOutcome::Success, Duration::from_millis(10));
        metrics.record(RequestOutcome::Failure, Duration::from_millis(30));
        metrics.record(RequestOutcome::Cancelled, Duration::from_millis(500));

        let snap = metrics.snapshot();
        assert_eq!(snap.requests, 3);
        assert_eq!(snap.successes, 1);
        assert_eq!(snap.failures, 1);
        assert_eq!(snap.cancelled, 1);
        assert_eq!(snap.average_latency(), Some(Duration::from_millis(20)));
    }

    #[test]
    fn test_reset() {
        let metrics = ClientMetrics::init();
        metrics.record(RequestOutcome::Success, Duration::from_millis(1));
        metrics.reset();

        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
        assert_eq!(metrics.snapshot().average_latency(), None);
    }
}
