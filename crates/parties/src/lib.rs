//! Parties domain module (users and flats).
//!
//! This crate contains business rules for residents and their flats,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage).

pub mod flat;
pub mod user;

pub use flat::Flat;
pub use user::User;
