use std::collections::HashMap;
use std::sync::RwLock;

use chrono::NaiveDate;

use flatshare_accounting::{Journal, LedgerEntry};
use flatshare_core::{AggregateRoot, Entity, FlatId, ItemId, Money, UserId};
use flatshare_inventory::Item;
use flatshare_moves::MovePlan;
use flatshare_parties::{Flat, User};

use super::r#trait::{FlatStore, StoreError};

#[derive(Debug, Default)]
struct StoreState {
    flats: HashMap<FlatId, Flat>,
    users: HashMap<UserId, User>,
    items: HashMap<ItemId, Item>,
    journal: Journal,
}

/// In-memory transactional flat store.
///
/// Intended for tests/dev. Not optimized for performance.
///
/// The whole state sits behind one `RwLock`; `commit_move` holds the write
/// guard for the full validate-then-apply sequence, so a commit is atomic and
/// moves are serialized. All fallible work (version check, journal batch
/// validation) happens against staged copies before any shared state changes.
#[derive(Debug, Default)]
pub struct InMemoryFlatStore {
    state: RwLock<StoreState>,
}

impl InMemoryFlatStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::InvalidCommit("lock poisoned".to_string())
}

impl FlatStore for InMemoryFlatStore {
    fn insert_flat(&self, flat: Flat) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        let id = flat.id_typed();
        if state.flats.contains_key(&id) {
            return Err(StoreError::Conflict(format!("flat {id} already exists")));
        }
        state.flats.insert(id, flat);
        Ok(())
    }

    fn insert_user(&self, user: User) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        let id = user.id_typed();
        if state.users.contains_key(&id) {
            return Err(StoreError::Conflict(format!("user {id} already exists")));
        }
        state.users.insert(id, user);
        Ok(())
    }

    fn insert_item(&self, item: Item) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        let id = item.id_typed();
        if state.items.contains_key(&id) {
            return Err(StoreError::Conflict(format!("item {id} already exists")));
        }
        let flat = state
            .flats
            .get_mut(&item.flat_id())
            .ok_or_else(|| StoreError::NotFound(format!("flat {}", item.flat_id())))?;
        flat.add_item(id)
            .map_err(|e| StoreError::Conflict(e.to_string()))?;
        state.items.insert(id, item);
        Ok(())
    }

    fn flat(&self, flat_id: FlatId) -> Result<Flat, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        state
            .flats
            .get(&flat_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("flat {flat_id}")))
    }

    fn user(&self, user_id: UserId) -> Result<User, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        state
            .users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))
    }

    fn item(&self, item_id: ItemId) -> Result<Item, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        state
            .items
            .get(&item_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("item {item_id}")))
    }

    fn items_in_flat(&self, flat_id: FlatId) -> Result<Vec<Item>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        let flat = state
            .flats
            .get(&flat_id)
            .ok_or_else(|| StoreError::NotFound(format!("flat {flat_id}")))?;
        flat.items()
            .iter()
            .map(|id| {
                state
                    .items
                    .get(id)
                    .cloned()
                    .ok_or_else(|| StoreError::NotFound(format!("item {id}")))
            })
            .collect()
    }

    fn commit_move(&self, plan: MovePlan) -> Result<Vec<LedgerEntry>, StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;

        // Validate everything before touching shared state.
        let flat_id = plan.flat.id_typed();
        let stored_flat = state
            .flats
            .get(&flat_id)
            .ok_or_else(|| StoreError::NotFound(format!("flat {flat_id}")))?;
        plan.expected_version()
            .check(stored_flat.version())
            .map_err(|e| StoreError::Concurrency(e.to_string()))?;

        let user_id = plan.user.id_typed();
        let stored_user = state
            .users
            .get(&user_id)
            .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))?;
        // The flat version only serializes moves on this flat. The user is
        // shared across flats, so the plan is also stale if the stored user no
        // longer matches the snapshot it was computed from (e.g. the same
        // unhoused user was concurrently moved into another flat).
        if *stored_user != plan.prior_user {
            return Err(StoreError::Concurrency(format!(
                "user {user_id} changed since the move was planned"
            )));
        }
        for change in &plan.item_changes {
            let id = change.item.id_typed();
            if !state.items.contains_key(&id) {
                return Err(StoreError::NotFound(format!("item {id}")));
            }
        }

        // Stage journal appends; batch validation failures abort the commit
        // with the journal (and everything else) untouched.
        let mut staged = state.journal.clone();
        for change in &plan.item_changes {
            staged
                .post(change.entries.clone())
                .map_err(|e| StoreError::InvalidCommit(e.to_string()))?;
        }

        // Apply. Nothing below can fail.
        let mut committed_flat = plan.flat;
        committed_flat.advance_version();
        state.flats.insert(flat_id, committed_flat);
        state.users.insert(user_id, plan.user);
        let mut committed_entries = Vec::new();
        for change in plan.item_changes {
            committed_entries.extend(change.entries.iter().cloned());
            state.items.insert(*change.item.id(), change.item);
        }
        state.journal = staged;

        Ok(committed_entries)
    }

    fn entries_for_user(&self, user_id: UserId) -> Result<Vec<LedgerEntry>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state
            .journal
            .entries_for_user(user_id)
            .into_iter()
            .cloned()
            .collect())
    }

    fn entries_for_item(&self, item_id: ItemId) -> Result<Vec<LedgerEntry>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state
            .journal
            .entries_for_item(item_id)
            .into_iter()
            .cloned()
            .collect())
    }

    fn entries_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state
            .journal
            .entries_between(from, to)
            .into_iter()
            .cloned()
            .collect())
    }

    fn balance_for_user(&self, user_id: UserId) -> Result<Money, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.journal.balance_for_user(user_id))
    }
}
