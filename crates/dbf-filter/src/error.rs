//! Error types for the distributed Bloom filter

use thiserror::Error;

/// Errors that can occur while building, querying or merging filters
///
/// Every variant is an input-contract violation reported synchronously.
/// Nothing here is transient, so nothing here is worth retrying.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid filter parameter: {0}")]
    InvalidParameter(String),

    #[error("Digest length mismatch: {left} != {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Bit index out of range: {index} >= {size}")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("Incompatible filter: {0}")]
    IncompatibleFilter(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, FilterError>;

impl From<bincode::Error> for FilterError {
    fn from(err: bincode::Error) -> Self {
        FilterError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for FilterError {
    fn from(err: serde_json::Error) -> Self {
        FilterError::Serialization(err.to_string())
    }
}
