//! Ports Layer
//!
//! Defines the interface that external collaborators (persistence,
//! transport, coordination) program against.

pub mod inbound;

pub use inbound::DistributedFilterApi;
