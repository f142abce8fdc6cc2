//! Infrastructure layer: transactional store and the move service.
//!
//! The domain crates decide *what* a move is worth; this crate decides *when*
//! it becomes real: it owns the transactional scope that makes Ownership Set
//! mutations and ledger appends one atomic unit.

pub mod service;
pub mod store;


pub use service::{MoveOutcome, MoveService, ServiceError};
pub use store::{FlatStore, InMemoryFlatStore, StoreError};
