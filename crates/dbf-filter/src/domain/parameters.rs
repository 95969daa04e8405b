//! Optimal Bloom filter parameter estimation
//!
//! Formulas:
//! - m = ceil(-n*ln(p) / (ln(2)^2))  -- bits in the array
//! - k = ceil((m/n) * ln(2))         -- hash functions
//!
//! Every participant must arrive at the same (m, k) for the same (n, p),
//! so the rounding here is part of the filter's identity.

use std::f64::consts::LN_2;

use crate::error::{FilterError, Result};

/// Bloom filter parameters
#[derive(Clone, Debug, PartialEq)]
pub struct FilterParams {
    /// Number of bits in the filter (m)
    pub size_bits: usize,
    /// Number of hash functions (k)
    pub hash_count: usize,
    /// Expected false positive rate once `n` elements are added
    pub expected_fpr: f64,
}

/// Estimate (m, k) for `num_elements` expected elements at `target_fpr`
///
/// # Errors
/// `InvalidParameter` if `num_elements` is zero or `target_fpr` is not
/// strictly between 0 and 1.
pub fn estimate(num_elements: usize, target_fpr: f64) -> Result<FilterParams> {
    if num_elements == 0 {
        return Err(FilterError::InvalidParameter(
            "expected element count must be positive".to_string(),
        ));
    }
    // Written so that NaN is rejected too.
    if !(target_fpr > 0.0 && target_fpr < 1.0) {
        return Err(FilterError::InvalidParameter(format!(
            "false positive rate {} must be in (0, 1)",
            target_fpr
        )));
    }

    let m = minimum_bits(num_elements, target_fpr);
    let k = optimal_k(m, num_elements);
    let expected_fpr = calculate_fpr(m, num_elements, k);

    Ok(FilterParams {
        size_bits: m,
        hash_count: k,
        expected_fpr,
    })
}

/// Calculate the false positive rate for given parameters
///
/// Formula: FPR = (1 - e^(-kn/m))^k
pub fn calculate_fpr(m: usize, n: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powi(k as i32)
}

/// Optimal k for given m and n, rounded up, never below 1
pub fn optimal_k(m: usize, n: usize) -> usize {
    if n == 0 {
        return 1;
    }
    let k = ((m as f64 / n as f64) * LN_2).ceil() as usize;
    k.max(1)
}

/// Minimum m for given n and target FPR, never below 1
pub fn minimum_bits(n: usize, target_fpr: f64) -> usize {
    let ln2_squared = LN_2 * LN_2;
    let m = (-(n as f64) * target_fpr.ln() / ln2_squared).ceil() as usize;
    m.max(1)
}
