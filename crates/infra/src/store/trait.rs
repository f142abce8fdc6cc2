use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;

use flatshare_accounting::LedgerEntry;
use flatshare_core::{FlatId, ItemId, Money, UserId};
use flatshare_inventory::Item;
use flatshare_moves::MovePlan;
use flatshare_parties::{Flat, User};

/// Store operation error.
///
/// These are **infrastructure errors** (missing rows, stale versions, broken
/// commit batches) as opposed to the domain errors raised while planning.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A referenced entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The state a plan was computed from advanced before it could commit: the
    /// flat's version moved on, or the moving user changed (a concurrent move
    /// into another flat committed first).
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    /// A plan failed commit-time validation; nothing was applied.
    #[error("invalid commit: {0}")]
    InvalidCommit(String),

    /// Setup-time conflict (e.g. inserting a duplicate id).
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Transactional store for flats, users, items and the settlement journal.
///
/// ## Design
///
/// - **No storage assumptions**: works with the in-memory implementation
///   (tests/dev) and future SQL backends behind the same trait.
/// - **Snapshot + commit**: callers read plain entity snapshots, plan a move
///   against them (pure domain code), and hand the finished [`MovePlan`] back
///   to `commit_move`.
/// - **Atomicity**: `commit_move` applies everything in a plan — residency,
///   ownership sets, journal batches — as one unit. Any failure leaves the
///   store exactly as it was.
/// - **Staleness rejection**: commit checks the plan's observed flat version
///   *and* compares the stored user against the plan's pre-move user snapshot,
///   rejecting either mismatch with [`StoreError::Concurrency`]. The version
///   serializes moves on one flat; the user comparison is required because a
///   user is shared between flats, so two concurrent move-ins of the same user
///   into different flats would otherwise both pass their flat's version
///   check. Implementations must enforce both. Moves on different flats that
///   touch different users are independent.
///
/// The `insert_*` / getter methods exist for the external CRUD collaborator
/// (and tests) to populate and inspect state; they are not part of the move
/// transaction itself.
pub trait FlatStore: Send + Sync {
    fn insert_flat(&self, flat: Flat) -> Result<(), StoreError>;

    fn insert_user(&self, user: User) -> Result<(), StoreError>;

    /// Insert an item and register it in its flat's item set.
    ///
    /// The registration is explicit here (validated precondition: the flat
    /// must exist) rather than an implicit relationship side effect.
    fn insert_item(&self, item: Item) -> Result<(), StoreError>;

    fn flat(&self, flat_id: FlatId) -> Result<Flat, StoreError>;

    fn user(&self, user_id: UserId) -> Result<User, StoreError>;

    fn item(&self, item_id: ItemId) -> Result<Item, StoreError>;

    /// All items registered in the flat, in id order.
    fn items_in_flat(&self, flat_id: FlatId) -> Result<Vec<Item>, StoreError>;

    /// Atomically apply a move plan. Returns the committed entries.
    fn commit_move(&self, plan: MovePlan) -> Result<Vec<LedgerEntry>, StoreError>;

    /// Audit-log queries (append-only journal).
    fn entries_for_user(&self, user_id: UserId) -> Result<Vec<LedgerEntry>, StoreError>;

    fn entries_for_item(&self, item_id: ItemId) -> Result<Vec<LedgerEntry>, StoreError>;

    fn entries_between(&self, from: NaiveDate, to: NaiveDate)
        -> Result<Vec<LedgerEntry>, StoreError>;

    /// Net amount the user owes (positive) or is owed (negative).
    fn balance_for_user(&self, user_id: UserId) -> Result<Money, StoreError>;
}

impl<S> FlatStore for Arc<S>
where
    S: FlatStore + ?Sized,
{
    fn insert_flat(&self, flat: Flat) -> Result<(), StoreError> {
        (**self).insert_flat(flat)
    }

    fn insert_user(&self, user: User) -> Result<(), StoreError> {
        (**self).insert_user(user)
    }

    fn insert_item(&self, item: Item) -> Result<(), StoreError> {
        (**self).insert_item(item)
    }

    fn flat(&self, flat_id: FlatId) -> Result<Flat, StoreError> {
        (**self).flat(flat_id)
    }

    fn user(&self, user_id: UserId) -> Result<User, StoreError> {
        (**self).user(user_id)
    }

    fn item(&self, item_id: ItemId) -> Result<Item, StoreError> {
        (**self).item(item_id)
    }

    fn items_in_flat(&self, flat_id: FlatId) -> Result<Vec<Item>, StoreError> {
        (**self).items_in_flat(flat_id)
    }

    fn commit_move(&self, plan: MovePlan) -> Result<Vec<LedgerEntry>, StoreError> {
        (**self).commit_move(plan)
    }

    fn entries_for_user(&self, user_id: UserId) -> Result<Vec<LedgerEntry>, StoreError> {
        (**self).entries_for_user(user_id)
    }

    fn entries_for_item(&self, item_id: ItemId) -> Result<Vec<LedgerEntry>, StoreError> {
        (**self).entries_for_item(item_id)
    }

    fn entries_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        (**self).entries_between(from, to)
    }

    fn balance_for_user(&self, user_id: UserId) -> Result<Money, StoreError> {
        (**self).balance_for_user(user_id)
    }
}
