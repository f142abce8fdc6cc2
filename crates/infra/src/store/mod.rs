//! Transactional flat-store boundary.
//!
//! This module defines an infrastructure-facing abstraction for loading move
//! snapshots and committing move plans without making any storage assumptions.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryFlatStore;
pub use r#trait::{FlatStore, StoreError};
