//! Domain Layer - Pure filter logic
//!
//! This layer contains:
//! - Parameter estimation
//! - Digests and the XOR seed combiner
//! - Seeded hash functions and index mapping
//! - The distributed Bloom filter
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - No global state: seed, element and parameters are always explicit

pub mod bloom_filter;
pub mod config;
pub mod digest;
pub mod hash_functions;
pub mod parameters;

pub use bloom_filter::DistributedBloomFilter;
pub use config::{FilterConfig, FilterConfigBuilder};
pub use digest::{combine, combine_slices, joint_seed, Digest, DIGEST_LEN, ZERO_DIGEST};
pub use hash_functions::{element_hashes, seed_hashes, to_index};
pub use parameters::{calculate_fpr, estimate, FilterParams};
