//! Inbound Ports (Driving Ports)
//!
//! The handle surface offered to a layer built on top of the filter. Wire
//! formats for the seed and for exported bit indices belong to that layer.

use crate::error::FilterError;

/// Distributed Bloom filter API (Driving Port)
///
/// All methods take `&self`; implementations serialize writers internally
/// so a handle can be shared across threads.
pub trait DistributedFilterApi: Send + Sync {
    /// Add an element
    fn add(&self, element: &[u8]);

    /// Test membership; may return a false positive, never a false negative
    fn might_contain(&self, element: &[u8]) -> bool;

    /// Bit positions for `element` in hash-function order
    fn element_indices(&self, element: &[u8]) -> Vec<usize>;

    /// Ascending, deduplicated set bit positions, for export
    fn bit_indices(&self) -> Vec<usize>;

    /// OR in a sparse snapshot exported by another participant
    fn merge_bit_indices(&self, indices: &[usize]) -> Result<(), FilterError>;
}
