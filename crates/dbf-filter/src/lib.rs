//! # Distributed Bloom Filter
//!
//! A Bloom filter that independent, non-communicating participants can each
//! build bit-for-bit identically from nothing more than a shared seed.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `estimate`: (n, p) to (m, k)
//!   - `seed_hashes`: seed to k base digests
//!   - `combine`: XOR combiner over digests
//!   - `element_hashes` / `to_index`: element to k bit positions
//!   - `DistributedBloomFilter`: the filter itself
//!   - `FilterConfig` / `FilterConfigBuilder`: validated configuration
//!
//! - **Ports Layer** (`ports/`): `DistributedFilterApi`, the surface a
//!   transport or persistence layer programs against
//!
//! - **Service Layer** (`service/`): `SharedFilter`, a lock-guarded handle
//!   for concurrent use
//!
//! ## Invariants
//!
//! - Same seed, same (m, k), same element: same bit positions, on any node
//! - No false negatives: if added, `might_contain()` MUST return true
//! - Bits only go from 0 to 1; there is no removal
//!
//! ## Usage Example
//!
//! ```ignore
//! use dbf_filter::DistributedBloomFilter;
//!
//! let mut local = DistributedBloomFilter::new(b"shared seed", 1_000, 0.01)?;
//! local.add(b"alice");
//!
//! // Another node, same seed, no coordination
//! let mut remote = DistributedBloomFilter::new(b"shared seed", 1_000, 0.01)?;
//! remote.merge_bit_indices(&local.bit_indices())?;
//! assert!(remote.might_contain(b"alice"));
//! ```

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use domain::{
    combine, combine_slices, element_hashes, estimate, joint_seed, seed_hashes, to_index, Digest,
    DistributedBloomFilter, FilterConfig, FilterConfigBuilder, FilterParams, DIGEST_LEN,
    ZERO_DIGEST,
};
pub use error::{FilterError, Result};
pub use metrics::{MergeKind, Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::DistributedFilterApi;
pub use service::SharedFilter;
