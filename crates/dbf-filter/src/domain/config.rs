//! Filter configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use dbf_filter::domain::FilterConfigBuilder;
//!
//! let config = FilterConfigBuilder::new()
//!     .expected_elements(10_000)
//!     .target_fpr(0.01)
//!     .build()
//!     .expect("Valid config");
//! ```
//!
//! The seed is deliberately not part of the configuration. It is the basis
//! of agreement between participants and is always passed explicitly.

use serde::{Deserialize, Serialize};

use super::parameters::{estimate, FilterParams};
use crate::error::{FilterError, Result};

/// Distributed Bloom filter configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Expected number of elements (n)
    pub expected_elements: usize,
    /// Target false positive rate, strictly between 0 and 1
    pub target_fpr: f64,
    /// Upper bound on the estimated bit-array size
    pub max_size_bits: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            expected_elements: 1_000,
            target_fpr: 0.01,
            max_size_bits: u32::MAX as usize, // ~512 MiB
        }
    }
}

impl FilterConfig {
    /// Create a new configuration with validation
    pub fn new(expected_elements: usize, target_fpr: f64, max_size_bits: usize) -> Result<Self> {
        let config = Self {
            expected_elements,
            target_fpr,
            max_size_bits,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from JSON and validate it
    ///
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: FilterConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.parameters().map(|_| ())
    }

    /// Estimated (m, k) for this configuration
    ///
    /// # Errors
    /// `InvalidParameter` if n or the FPR is out of range, or if the
    /// estimated m exceeds `max_size_bits`.
    pub fn parameters(&self) -> Result<FilterParams> {
        if self.max_size_bits == 0 {
            return Err(FilterError::InvalidParameter(
                "max_size_bits cannot be 0".to_string(),
            ));
        }

        let params = estimate(self.expected_elements, self.target_fpr)?;
        if params.size_bits > self.max_size_bits {
            return Err(FilterError::InvalidParameter(format!(
                "filter size {} bits exceeds maximum {}",
                params.size_bits, self.max_size_bits
            )));
        }
        Ok(params)
    }

    /// Builder-style method to set expected elements
    pub fn with_expected_elements(mut self, n: usize) -> Self {
        self.expected_elements = n;
        self
    }

    /// Builder-style method to set target FPR
    pub fn with_target_fpr(mut self, fpr: f64) -> Self {
        self.target_fpr = fpr;
        self
    }
}

/// Builder for FilterConfig with validation
#[derive(Default)]
pub struct FilterConfigBuilder {
    expected_elements: Option<usize>,
    target_fpr: Option<f64>,
    max_size_bits: Option<usize>,
}

impl FilterConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set expected number of elements
    pub fn expected_elements(mut self, n: usize) -> Self {
        self.expected_elements = Some(n);
        self
    }

    /// Set target false positive rate
    pub fn target_fpr(mut self, fpr: f64) -> Self {
        self.target_fpr = Some(fpr);
        self
    }

    /// Set maximum filter size in bits
    pub fn max_size_bits(mut self, bits: usize) -> Self {
        self.max_size_bits = Some(bits);
        self
    }

    /// Build the FilterConfig, validating all parameters
    pub fn build(self) -> Result<FilterConfig> {
        let defaults = FilterConfig::default();

        let config = FilterConfig {
            expected_elements: self.expected_elements.unwrap_or(defaults.expected_elements),
            target_fpr: self.target_fpr.unwrap_or(defaults.target_fpr),
            max_size_bits: self.max_size_bits.unwrap_or(defaults.max_size_bits),
        };

        config.validate()?;
        Ok(config)
    }
}
