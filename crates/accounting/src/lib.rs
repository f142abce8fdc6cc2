//! Accounting module (settlement engine + append-only journal).
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod journal;
pub mod settlement;

pub use journal::{EntryKind, Journal, LedgerEntry};
pub use settlement::{settle_buy_in, settle_buy_out};
