//! Counters for traffic between the server and the document store.
//!
//! One [`Metrics`] is owned by each [`ElasticClient`](crate::client::ElasticClient)
//! and shared by its clones.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Counters {
    requests: AtomicU64,
    failures: AtomicU64,
    latency_ms: AtomicU64,
    documents_read: AtomicU64,
    documents_written: AtomicU64,
}

/// Backend request and document counters.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    counters: Arc<Counters>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one finished backend request.
    pub fn observe(&self, elapsed: Duration, failed: bool) {
        let c = &self.counters;
        c.requests.fetch_add(1, Ordering::Relaxed);
        c.latency_ms
            .fetch_add(elapsed.as_millis() as u64, Ordering::Relaxed);
        if failed {
            c.failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Count documents returned by a get or a search.
    pub fn add_documents_read(&self, count: usize) {
        self.counters
            .documents_read
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Count one document indexed or deleted.
    pub fn add_document_written(&self) {
        self.counters.documents_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests(&self) -> u64 {
        self.counters.requests.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.counters.failures.load(Ordering::Relaxed)
    }

    pub fn documents_read(&self) -> u64 {
        self.counters.documents_read.load(Ordering::Relaxed)
    }

    pub fn documents_written(&self) -> u64 {
        self.counters.documents_written.load(Ordering::Relaxed)
    }

    /// Mean request latency; zero before the first request.
    pub fn mean_latency_ms(&self) -> f64 {
        match self.requests() {
            0 => 0.0,
            n => self.counters.latency_ms.load(Ordering::Relaxed) as f64 / n as f64,
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests(),
            failures: self.failures(),
            latency_ms: self.counters.latency_ms.load(Ordering::Relaxed),
            mean_latency_ms: self.mean_latency_ms(),
            documents_read: self.documents_read(),
            documents_written: self.documents_written(),
        }
    }
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub failures: u64,
    pub latency_ms: u64,
    pub mean_latency_ms: f64,
    pub documents_read: u64,
    pub documents_written: u64,
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} requests ({} failed, mean {:.1} ms), {} documents read, {} written",
            self.requests,
            self.failures,
            self.mean_latency_ms,
            self.documents_read,
            self.documents_written
        )
    }
}

/// Measures one backend request from creation until `succeeded` or `failed`.
pub struct RequestTimer<'a> {
    started: Instant,
    metrics: &'a Metrics,
}

impl<'a> RequestTimer<'a> {
    pub fn start(metrics: &'a Metrics) -> Self {
        Self {
            started: Instant::now(),
            metrics,
        }
    }

    pub fn succeeded(self) {
        self.metrics.observe(self.started.elapsed(), false);
    }

    pub fn failed(self) {
        self.metrics.observe(self.started.elapsed(), true);
    }
}
