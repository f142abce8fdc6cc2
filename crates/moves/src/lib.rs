//! Move orchestration (decision half).
//!
//! This crate plans move-in / move-out transactions for a flat, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage). A plan
//! walks the phases the transaction promises:
//!
//! ```text
//! move-in:  Validate → AttachUser  → PerEvaluation → (Commit: infra)
//! move-out: Validate → PerEvaluation → DetachUser  → (Commit: infra)
//! ```
//!
//! Planning mutates nothing: it settles every affected item, applies the
//! membership change to *cloned* entity snapshots and returns the whole
//! outcome as a [`MovePlan`]. The store commits a plan atomically or not at
//! all, guarded by the flat version captured here.

pub mod plan;

pub use plan::{plan_move_in, plan_move_out, ItemChange, MoveIn, MoveOut, MovePlan};
