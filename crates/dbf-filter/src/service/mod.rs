//! Service Layer
//!
//! Wraps the domain filter for shared, concurrent use.

pub mod shared_filter;

pub use shared_filter::SharedFilter;
