//! Hash functions for the distributed Bloom filter
//!
//! The filter's k hash functions are not seeded integers but k base digests
//! derived from a shared seed. An element is folded into every base digest
//! and each result is reduced to a bit position. Independent participants
//! holding the same seed therefore agree on every bit without talking to
//! each other.
//!
//! All functions here are pure.

use primitive_types::U256;

use super::digest::{combine, hash_parts, Digest};

/// Derive the k base digests for `seed`
///
/// Entry i is `SHA-512/256(seed ‖ be64(i))`. A digest that repeats an
/// earlier entry is re-hashed with its index until it is new, so the result
/// always holds k pairwise distinct digests.
pub fn seed_hashes(seed: &[u8], k: usize) -> Vec<Digest> {
    let mut hashes: Vec<Digest> = Vec::with_capacity(k);
    for i in 0..k {
        let index = (i as u64).to_be_bytes();
        let mut digest = hash_parts(&[seed, index.as_slice()]);
        while hashes.contains(&digest) {
            digest = hash_parts(&[digest.as_slice(), index.as_slice()]);
        }
        hashes.push(digest);
    }
    hashes
}

/// Fold `element` into each base digest
///
/// Output i is `base[i] XOR SHA-512/256(SHA-512/256(element) ‖ be64(i))`.
/// The per-index re-hash keeps two base digests that happen to share bytes
/// from mapping every element the same way. As with [`seed_hashes`], a
/// candidate equal to its base digest or to an earlier output is re-hashed
/// until it is neither.
pub fn element_hashes(element: &[u8], base_hashes: &[Digest]) -> Vec<Digest> {
    let element_digest = hash_parts(&[element]);
    let mut hashes: Vec<Digest> = Vec::with_capacity(base_hashes.len());
    for (i, base) in base_hashes.iter().enumerate() {
        let index = (i as u64).to_be_bytes();
        let folded = hash_parts(&[element_digest.as_slice(), index.as_slice()]);
        let mut digest = combine(base, &folded);
        while digest == *base || hashes.contains(&digest) {
            digest = hash_parts(&[digest.as_slice(), index.as_slice()]);
        }
        hashes.push(digest);
    }
    hashes
}

/// Reduce a digest to a bit position in `[0, m)`
///
/// The whole 256-bit big-endian value is reduced, not a prefix, so positions
/// stay uniform over the array.
///
/// # Panics
/// Panics if `m` is zero. Filters never hold a zero-sized array.
pub fn to_index(digest: &Digest, m: usize) -> usize {
    let value = U256::from_big_endian(digest);
    let rem = value % U256::from(m as u64);
    rem.low_u64() as usize
}

/// Bit positions of `element` under `base_hashes` in an m-bit array
pub fn compute_hash_positions(element: &[u8], base_hashes: &[Digest], m: usize) -> Vec<usize> {
    element_hashes(element, base_hashes)
        .iter()
        .map(|digest| to_index(digest, m))
        .collect()
}
