//! Inventory domain module (shared household items).
//!
//! This crate contains business rules for items and their co-ownership,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage).

pub mod item;
pub mod ownership;
pub mod valuation;

pub use item::Item;
pub use ownership::OwnershipSet;
pub use valuation::current_value;
