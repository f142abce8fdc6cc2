//! Move execution pipeline (application-level orchestration).
//!
//! `MoveService` runs the full move transaction against a [`FlatStore`]:
//!
//! ```text
//! Command
//!   ↓
//! 1. Load snapshots from the store (flat, user, the flat's items)
//!   ↓
//! 2. Plan (pure decision logic: validation + per-item settlement)
//!   ↓
//! 3. Commit the plan (atomic apply, flat-version concurrency check)
//! ```
//!
//! The service itself holds no state and performs no IO beyond the injected
//! store, so it is testable with the in-memory store and swappable onto a real
//! backend without changing domain code. Re-running a committed move is a new
//! event producing new entries; retry safety comes from commit atomicity, not
//! from idempotence.

use thiserror::Error;

use flatshare_accounting::LedgerEntry;
use flatshare_core::DomainError;
use flatshare_moves::{plan_move_in, plan_move_out, MoveIn, MoveOut};
use flatshare_parties::User;

use crate::store::{FlatStore, StoreError};

/// Move execution error: either the plan was rejected (domain) or the commit
/// failed (store). In both cases the store is unchanged.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of a committed move: the user's post-move state and the entries the
/// settlement produced.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub user: User,
    pub entries: Vec<LedgerEntry>,
}

/// Coordinates move-in / move-out transactions over a [`FlatStore`].
#[derive(Debug)]
pub struct MoveService<S> {
    store: S,
}

impl<S> MoveService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: FlatStore> MoveService<S> {
    /// Move a user into a flat, buying into every non-excluded item.
    pub fn move_in(&self, cmd: &MoveIn) -> Result<MoveOutcome, ServiceError> {
        let flat = self.store.flat(cmd.flat_id)?;
        let user = self.store.user(cmd.user_id)?;
        let items = self.store.items_in_flat(cmd.flat_id)?;

        let plan = plan_move_in(&flat, &user, &items, cmd)?;
        let user = plan.user.clone();
        let entries = self.store.commit_move(plan)?;

        tracing::info!(
            flat_id = %cmd.flat_id,
            user_id = %cmd.user_id,
            effective_date = %cmd.effective_date,
            entries = entries.len(),
            "move-in committed"
        );
        Ok(MoveOutcome { user, entries })
    }

    /// Move a user out of a flat, buying them out of every item they co-own.
    pub fn move_out(&self, cmd: &MoveOut) -> Result<MoveOutcome, ServiceError> {
        let flat = self.store.flat(cmd.flat_id)?;
        let user = self.store.user(cmd.user_id)?;
        let items = self.store.items_in_flat(cmd.flat_id)?;

        let plan = plan_move_out(&flat, &user, &items, cmd)?;
        let user = plan.user.clone();
        let entries = self.store.commit_move(plan)?;

        tracing::info!(
            flat_id = %cmd.flat_id,
            user_id = %cmd.user_id,
            effective_date = %cmd.effective_date,
            entries = entries.len(),
            "move-out committed"
        );
        Ok(MoveOutcome { user, entries })
    }
}
