//! Fixed-width digests and the XOR seed combiner
//!
//! A digest is 256 bits, read as a big-endian unsigned integer when it is
//! reduced to a bit index and as a plain byte vector when two digests are
//! combined.

use sha2::{Digest as _, Sha512_256};

use crate::error::{FilterError, Result};

/// Digest width in bytes
pub const DIGEST_LEN: usize = 32;

/// A 256-bit digest
pub type Digest = [u8; DIGEST_LEN];

/// The all-zero digest, identity element of [`combine`]
pub const ZERO_DIGEST: Digest = [0u8; DIGEST_LEN];

/// SHA-512/256 over the concatenation of `parts`
pub fn hash_parts(parts: &[&[u8]]) -> Digest {
    let mut hasher = Sha512_256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut out = ZERO_DIGEST;
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Byte-wise XOR of two digests
///
/// Commutative, associative and self-inverse, with [`ZERO_DIGEST`] as the
/// identity.
pub fn combine(a: &Digest, b: &Digest) -> Digest {
    let mut out = ZERO_DIGEST;
    for (o, (x, y)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
        *o = x ^ y;
    }
    out
}

/// Byte-wise XOR of two equal-length byte strings
///
/// # Errors
/// `LengthMismatch` when the inputs differ in length. The shorter input is
/// never padded and the longer one is never truncated.
pub fn combine_slices(a: &[u8], b: &[u8]) -> Result<Vec<u8>> {
    if a.len() != b.len() {
        return Err(FilterError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(a.iter().zip(b.iter()).map(|(x, y)| x ^ y).collect())
}

/// Joint seed for two participants
///
/// Each side contributes a digest it generated on its own. Either side can
/// recover the other's contribution from the joint seed and its own half,
/// so neither needs to publish raw seed material up front.
pub fn joint_seed(ours: &Digest, theirs: &Digest) -> Digest {
    combine(ours, theirs)
}

/// Short hex prefix of a digest, for log lines
pub(crate) fn fingerprint(digest: &Digest) -> String {
    hex::encode(&digest[..4])
}
