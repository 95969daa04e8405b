//! Thread-safe filter handle
//!
//! Hashing is pure and runs without any lock. Only the bit array is
//! guarded: writers (`add`, merges) take the write lock, readers take the
//! read lock, so no reader ever sees a half-applied insertion.

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::domain::hash_functions::compute_hash_positions;
use crate::domain::{Digest, DistributedBloomFilter, FilterConfig};
use crate::error::FilterError;
use crate::metrics::{MergeKind, MetricsRecorder, NoOpMetrics};
use crate::ports::DistributedFilterApi;

/// Cloneable, shareable handle to one distributed Bloom filter
#[derive(Clone)]
pub struct SharedFilter {
    /// Filter state; only the bit array ever changes
    inner: Arc<RwLock<DistributedBloomFilter>>,
    /// Copy of the immutable base hashes, readable without locking
    base_hashes: Arc<[Digest]>,
    /// Filter size in bits (m)
    m: usize,
    /// Metrics sink
    metrics: Arc<dyn MetricsRecorder>,
}

impl SharedFilter {
    /// Create a filter from `seed` and a validated configuration
    pub fn new(seed: &[u8], config: &FilterConfig) -> Result<Self, FilterError> {
        Self::with_metrics(seed, config, Arc::new(NoOpMetrics))
    }

    /// Create with a custom metrics recorder
    pub fn with_metrics(
        seed: &[u8],
        config: &FilterConfig,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Result<Self, FilterError> {
        let filter = DistributedBloomFilter::from_config(seed, config)?;
        Ok(Self::from_filter(filter, metrics))
    }

    /// Wrap an existing filter
    pub fn from_filter(filter: DistributedBloomFilter, metrics: Arc<dyn MetricsRecorder>) -> Self {
        metrics.record_filter_created(filter.size_bits());
        Self {
            base_hashes: filter.base_hashes().into(),
            m: filter.size_bits(),
            inner: Arc::new(RwLock::new(filter)),
            metrics,
        }
    }

    /// Add an element
    pub fn add(&self, element: &[u8]) {
        let start = Instant::now();
        let positions = self.positions(element);
        self.inner.write().set_positions(&positions);
        self.metrics.record_insert(start.elapsed());
    }

    /// Test if an element might be in the filter
    pub fn might_contain(&self, element: &[u8]) -> bool {
        let start = Instant::now();
        let positions = self.positions(element);
        let found = self.inner.read().all_set(&positions);
        self.metrics.record_lookup(start.elapsed(), found);
        found
    }

    /// Bit positions for `element`, in hash-function order
    pub fn element_indices(&self, element: &[u8]) -> Vec<usize> {
        self.positions(element)
    }

    /// Currently set bit positions, ascending
    pub fn bit_indices(&self) -> Vec<usize> {
        self.inner.read().bit_indices()
    }

    /// Merge a full filter from another participant
    pub fn merge(&self, other: &DistributedBloomFilter) -> Result<(), FilterError> {
        let result = self.inner.write().merge(other);
        self.record_merge(&result, MergeKind::Full);
        result
    }

    /// Merge a sparse bit-index snapshot from another participant
    pub fn merge_bit_indices(&self, indices: &[usize]) -> Result<(), FilterError> {
        let result = self.inner.write().merge_bit_indices(indices);
        self.record_merge(
            &result,
            MergeKind::Sparse {
                indices: indices.len(),
            },
        );
        result
    }

    /// Consistent copy of the current filter state
    pub fn snapshot(&self) -> DistributedBloomFilter {
        let snapshot = self.inner.read().clone();
        debug!(bits_set = snapshot.bits_set(), "took filter snapshot");
        snapshot
    }

    /// Filter size in bits
    pub fn size_bits(&self) -> usize {
        self.m
    }

    /// Number of hash functions
    pub fn hash_count(&self) -> usize {
        self.base_hashes.len()
    }

    fn record_merge(&self, result: &Result<(), FilterError>, kind: MergeKind) {
        match result {
            Ok(()) => self.metrics.record_merge(kind),
            Err(_) => self.metrics.record_merge_rejected(),
        }
    }

    fn positions(&self, element: &[u8]) -> Vec<usize> {
        compute_hash_positions(element, &self.base_hashes, self.m)
    }
}

impl DistributedFilterApi for SharedFilter {
    fn add(&self, element: &[u8]) {
        SharedFilter::add(self, element);
    }

    fn might_contain(&self, element: &[u8]) -> bool {
        SharedFilter::might_contain(self, element)
    }

    fn element_indices(&self, element: &[u8]) -> Vec<usize> {
        SharedFilter::element_indices(self, element)
    }

    fn bit_indices(&self) -> Vec<usize> {
        SharedFilter::bit_indices(self)
    }

    fn merge_bit_indices(&self, indices: &[usize]) -> Result<(), FilterError> {
        SharedFilter::merge_bit_indices(self, indices)
    }
}
