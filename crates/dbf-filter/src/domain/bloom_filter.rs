//! Seeded Bloom filter shared by independent participants
//!
//! INVARIANTS:
//! - Same (seed, m, k) on two nodes gives the same base hashes, so the same
//!   element sets the same bits everywhere.
//! - No false negatives: once added, `might_contain()` MUST return true.
//! - Bits only ever go from 0 to 1.

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::config::FilterConfig;
use super::digest::{fingerprint, Digest};
use super::hash_functions::{compute_hash_positions, seed_hashes};
use super::parameters::calculate_fpr;
use crate::error::{FilterError, Result};

/// Bloom filter whose hash functions are derived from a shared seed
///
/// Deserialization goes through [`FilterState`], so a decoded filter always
/// has `m` bits and `k` base hashes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "FilterState")]
pub struct DistributedBloomFilter {
    /// Bit array storing the filter state
    #[serde(with = "bitvec_serde")]
    bits: BitVec<u8, Lsb0>,
    /// Size in bits (m)
    m: usize,
    /// Number of hash functions (k)
    k: usize,
    /// One base digest per hash function, in hash-function order
    base_hashes: Vec<Digest>,
    /// Number of `add` calls (n)
    n: usize,
}

/// Decoded fields, not yet checked against each other
#[derive(Deserialize)]
struct FilterState {
    #[serde(with = "bitvec_serde")]
    bits: BitVec<u8, Lsb0>,
    m: usize,
    k: usize,
    base_hashes: Vec<Digest>,
    n: usize,
}

impl TryFrom<FilterState> for DistributedBloomFilter {
    type Error = FilterError;

    fn try_from(state: FilterState) -> Result<Self> {
        let filter = Self {
            bits: state.bits,
            m: state.m,
            k: state.k,
            base_hashes: state.base_hashes,
            n: state.n,
        };
        filter.check_shape()?;
        Ok(filter)
    }
}

/// Serde support for BitVec
mod bitvec_serde {
    use bitvec::prelude::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(bits: &BitVec<u8, Lsb0>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let bytes: Vec<u8> = bits.as_raw_slice().to_vec();
        (bytes, bits.len()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BitVec<u8, Lsb0>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (bytes, len): (Vec<u8>, usize) = Deserialize::deserialize(deserializer)?;
        let mut bits = BitVec::<u8, Lsb0>::from_vec(bytes);
        bits.truncate(len);
        Ok(bits)
    }
}

impl DistributedBloomFilter {
    /// Create a filter sized for `expected_elements` at `target_fpr`
    ///
    /// The estimated size is capped at the default
    /// [`FilterConfig::max_size_bits`]; use [`Self::from_config`] to raise it.
    ///
    /// # Errors
    /// `InvalidParameter` if `expected_elements` is zero, `target_fpr` is
    /// not strictly between 0 and 1, or the estimated m exceeds the cap.
    pub fn new(seed: &[u8], expected_elements: usize, target_fpr: f64) -> Result<Self> {
        let config = FilterConfig {
            expected_elements,
            target_fpr,
            ..FilterConfig::default()
        };
        Self::from_config(seed, &config)
    }

    /// Create a filter with explicit m and k
    ///
    /// `m` is taken as given and allocated up front, m/8 bytes.
    pub fn with_params(seed: &[u8], m: usize, k: usize) -> Result<Self> {
        if m == 0 || k == 0 {
            return Err(FilterError::InvalidParameter(format!(
                "m={} and k={} must both be positive",
                m, k
            )));
        }

        let base_hashes = seed_hashes(seed, k);
        debug!(
            m,
            k,
            first_base = %fingerprint(&base_hashes[0]),
            "created distributed bloom filter"
        );

        Ok(Self {
            bits: bitvec![u8, Lsb0; 0; m],
            m,
            k,
            base_hashes,
            n: 0,
        })
    }

    /// Create a filter from a validated configuration
    pub fn from_config(seed: &[u8], config: &FilterConfig) -> Result<Self> {
        let params = config.parameters()?;
        Self::with_params(seed, params.size_bits, params.hash_count)
    }

    /// Bit positions for `element`, in hash-function order
    ///
    /// Two hash functions may land on the same bit, so duplicates are
    /// possible.
    pub fn element_indices(&self, element: &[u8]) -> Vec<usize> {
        let positions = compute_hash_positions(element, &self.base_hashes, self.m);
        debug_assert!(
            positions.iter().all(|&pos| pos < self.m),
            "{}",
            FilterError::IndexOutOfRange {
                index: positions.iter().copied().max().unwrap_or(0),
                size: self.m
            }
        );
        positions
    }

    /// Add an element to the filter
    ///
    /// Adding the same element again leaves the bit array unchanged.
    pub fn add(&mut self, element: &[u8]) {
        let positions = self.element_indices(element);
        self.set_positions(&positions);
        trace!(?positions, "added element");
    }

    /// Set precomputed positions for one element
    pub(crate) fn set_positions(&mut self, positions: &[usize]) {
        for &pos in positions {
            self.bits.set(pos, true);
        }
        self.n = self.n.saturating_add(1);
    }

    /// Test if an element might be in the filter
    ///
    /// Returns:
    /// - `true` if the element might be in the set (could be false positive)
    /// - `false` if the element is definitely NOT in the set
    pub fn might_contain(&self, element: &[u8]) -> bool {
        let positions = self.element_indices(element);
        self.all_set(&positions)
    }

    /// Whether every position in `positions` is set
    pub(crate) fn all_set(&self, positions: &[usize]) -> bool {
        positions.iter().all(|&pos| self.bits[pos])
    }

    /// Currently set bit positions, ascending and without duplicates
    ///
    /// This is the sparse form of the filter meant for export: most of the
    /// array is zero for a filter that is not yet near capacity.
    pub fn bit_indices(&self) -> Vec<usize> {
        self.bits.iter_ones().collect()
    }

    /// Whether `other` was built from the same m, k and seed
    pub fn is_compatible(&self, other: &DistributedBloomFilter) -> bool {
        self.m == other.m && self.k == other.k && self.base_hashes == other.base_hashes
    }

    /// Merge another participant's filter into this one (OR operation)
    ///
    /// # Errors
    /// `IncompatibleFilter` if the filters differ in m, k or base hashes.
    pub fn merge(&mut self, other: &DistributedBloomFilter) -> Result<()> {
        if !self.is_compatible(other) {
            warn!(
                self_m = self.m,
                other_m = other.m,
                self_k = self.k,
                other_k = other.k,
                "rejected merge of incompatible filter"
            );
            return Err(FilterError::IncompatibleFilter(format!(
                "(m={}, k={}) vs (m={}, k={}) or different seed",
                self.m, self.k, other.m, other.k
            )));
        }

        let self_raw = self.bits.as_raw_mut_slice();
        let other_raw = other.bits.as_raw_slice();
        for (s, o) in self_raw.iter_mut().zip(other_raw.iter()) {
            *s |= *o;
        }
        self.n = self.n.saturating_add(other.n);
        debug!(bits_set = self.bits_set(), "merged filter");
        Ok(())
    }

    /// Merge a sparse bit-index snapshot from another participant
    ///
    /// All indices are checked before any bit is set, so a bad snapshot
    /// leaves the filter untouched.
    ///
    /// # Errors
    /// `IndexOutOfRange` for the first index that is `>= m`.
    pub fn merge_bit_indices(&mut self, indices: &[usize]) -> Result<()> {
        if let Some(&index) = indices.iter().find(|&&index| index >= self.m) {
            warn!(index, m = self.m, "rejected out-of-range bit index");
            return Err(FilterError::IndexOutOfRange {
                index,
                size: self.m,
            });
        }
        for &index in indices {
            self.bits.set(index, true);
        }
        debug!(imported = indices.len(), bits_set = self.bits_set(), "merged bit indices");
        Ok(())
    }

    /// Estimated false positive rate after the elements added so far
    ///
    /// Formula: FPR = (1 - e^(-kn/m))^k
    pub fn false_positive_rate(&self) -> f64 {
        calculate_fpr(self.m, self.n, self.k)
    }

    /// Get the number of bits set in the filter
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    /// Get the filter size in bits
    pub fn size_bits(&self) -> usize {
        self.m
    }

    /// Get the number of hash functions
    pub fn hash_count(&self) -> usize {
        self.k
    }

    /// Get the base digests, one per hash function
    pub fn base_hashes(&self) -> &[Digest] {
        &self.base_hashes
    }

    /// Get the number of `add` calls
    pub fn elements_added(&self) -> usize {
        self.n
    }

    /// Serialize the filter to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize a filter from bytes
    ///
    /// # Errors
    /// `Serialization` if decoding fails or the decoded state is not a
    /// well-formed filter.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    fn check_shape(&self) -> Result<()> {
        if self.m == 0 || self.k == 0 {
            return Err(FilterError::Serialization(
                "decoded filter has zero m or k".to_string(),
            ));
        }
        if self.base_hashes.len() != self.k {
            return Err(FilterError::Serialization(format!(
                "decoded filter has {} base hashes for k={}",
                self.base_hashes.len(),
                self.k
            )));
        }
        if self.bits.len() != self.m {
            return Err(FilterError::Serialization(format!(
                "decoded filter has {} bits for m={}",
                self.bits.len(),
                self.m
            )));
        }
        Ok(())
    }
}
