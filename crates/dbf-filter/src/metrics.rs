//! Metrics hooks for distributed Bloom filter operations
//!
//! ## Usage
//!
//! ```ignore
//! use dbf_filter::metrics::Metrics;
//! use dbf_filter::{FilterConfig, SharedFilter};
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(Metrics::new());
//! let filter = SharedFilter::with_metrics(b"seed", &FilterConfig::default(), metrics.clone())?;
//! filter.add(b"element");
//! assert_eq!(metrics.snapshot().elements_added, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// How another participant's state arrived
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeKind {
    /// A whole filter, OR-ed byte by byte
    Full,
    /// A sparse bit-index snapshot of `indices` entries
    Sparse { indices: usize },
}

/// Atomic counters for one or more filters
#[derive(Default)]
pub struct Metrics {
    filters_created: AtomicU64,
    bits_allocated: AtomicU64,
    elements_added: AtomicU64,
    insert_time_ns: AtomicU64,
    lookups_performed: AtomicU64,
    lookups_positive: AtomicU64,
    lookup_time_ns: AtomicU64,
    full_merges: AtomicU64,
    sparse_merges: AtomicU64,
    indices_imported: AtomicU64,
    merges_rejected: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        let elements_added = load(&self.elements_added);
        let lookups_performed = load(&self.lookups_performed);

        MetricsSnapshot {
            filters_created: load(&self.filters_created),
            bits_allocated: load(&self.bits_allocated),
            elements_added,
            avg_insert_ns: average(load(&self.insert_time_ns), elements_added),
            lookups_performed,
            lookups_positive: load(&self.lookups_positive),
            avg_lookup_ns: average(load(&self.lookup_time_ns), lookups_performed),
            full_merges: load(&self.full_merges),
            sparse_merges: load(&self.sparse_merges),
            indices_imported: load(&self.indices_imported),
            merges_rejected: load(&self.merges_rejected),
        }
    }
}

fn average(total: u64, count: u64) -> u64 {
    total.checked_div(count).unwrap_or(0)
}

fn nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub filters_created: u64,
    pub bits_allocated: u64,
    pub elements_added: u64,
    pub avg_insert_ns: u64,
    pub lookups_performed: u64,
    /// Includes false positives
    pub lookups_positive: u64,
    pub avg_lookup_ns: u64,
    pub full_merges: u64,
    pub sparse_merges: u64,
    pub indices_imported: u64,
    pub merges_rejected: u64,
}

/// Sink for filter events
///
/// Implement this trait to forward to an external metrics system.
pub trait MetricsRecorder: Send + Sync {
    fn record_filter_created(&self, size_bits: usize);

    fn record_insert(&self, duration: Duration);

    /// `found` may be a false positive
    fn record_lookup(&self, duration: Duration, found: bool);

    fn record_merge(&self, kind: MergeKind);

    /// A merge or snapshot import that left the filter unchanged
    fn record_merge_rejected(&self);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_filter_created(&self, _: usize) {}
    fn record_insert(&self, _: Duration) {}
    fn record_lookup(&self, _: Duration, _: bool) {}
    fn record_merge(&self, _: MergeKind) {}
    fn record_merge_rejected(&self) {}
}

impl MetricsRecorder for Metrics {
    fn record_filter_created(&self, size_bits: usize) {
        self.filters_created.fetch_add(1, Ordering::Relaxed);
        self.bits_allocated
            .fetch_add(size_bits as u64, Ordering::Relaxed);
    }

    fn record_insert(&self, duration: Duration) {
        self.elements_added.fetch_add(1, Ordering::Relaxed);
        self.insert_time_ns
            .fetch_add(nanos(duration), Ordering::Relaxed);
    }

    fn record_lookup(&self, duration: Duration, found: bool) {
        self.lookups_performed.fetch_add(1, Ordering::Relaxed);
        self.lookup_time_ns
            .fetch_add(nanos(duration), Ordering::Relaxed);
        if found {
            self.lookups_positive.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record_merge(&self, kind: MergeKind) {
        match kind {
            MergeKind::Full => {
                self.full_merges.fetch_add(1, Ordering::Relaxed);
            }
            MergeKind::Sparse { indices } => {
                self.sparse_merges.fetch_add(1, Ordering::Relaxed);
                self.indices_imported
                    .fetch_add(indices as u64, Ordering::Relaxed);
            }
        }
    }

    fn record_merge_rejected(&self) {
        self.merges_rejected.fetch_add(1, Ordering::Relaxed);
    }
}
