use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use flatshare_core::{AggregateRoot, DomainError, DomainResult, FlatId, ItemId, UserId};

/// A shared household: its current residents and the items located in it.
///
/// The flat is the consistency boundary for move transactions. `version`
/// advances on every committed move, which is what the store's optimistic
/// concurrency check compares against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flat {
    id: FlatId,
    name: String,
    residents: BTreeSet<UserId>,
    items: BTreeSet<ItemId>,
    version: u64,
}

impl Flat {
    pub fn new(id: FlatId, name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("flat name cannot be empty"));
        }
        Ok(Self {
            id,
            name,
            residents: BTreeSet::new(),
            items: BTreeSet::new(),
            version: 0,
        })
    }

    pub fn id_typed(&self) -> FlatId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn residents(&self) -> &BTreeSet<UserId> {
        &self.residents
    }

    pub fn items(&self) -> &BTreeSet<ItemId> {
        &self.items
    }

    pub fn has_resident(&self, user_id: UserId) -> bool {
        self.residents.contains(&user_id)
    }

    pub fn has_item(&self, item_id: ItemId) -> bool {
        self.items.contains(&item_id)
    }

    /// Add a resident. Fails if the user already lives here.
    pub fn add_resident(&mut self, user_id: UserId) -> DomainResult<()> {
        if !self.residents.insert(user_id) {
            return Err(DomainError::AlreadyHoused);
        }
        Ok(())
    }

    /// Remove a resident.
    ///
    /// A flat must never be emptied by a move-out: removing the sole remaining
    /// resident fails with `LastResident` (otherwise every item in the flat
    /// would be orphaned at once).
    pub fn remove_resident(&mut self, user_id: UserId) -> DomainResult<()> {
        if !self.residents.contains(&user_id) {
            return Err(DomainError::NotResident);
        }
        if self.residents.len() == 1 {
            return Err(DomainError::LastResident);
        }
        self.residents.remove(&user_id);
        Ok(())
    }

    /// Register an item as located in this flat (external CRUD trigger).
    pub fn add_item(&mut self, item_id: ItemId) -> DomainResult<()> {
        if !self.items.insert(item_id) {
            return Err(DomainError::conflict("item already registered in flat"));
        }
        Ok(())
    }

    /// Deregister an item (explicit retirement/disposition).
    pub fn remove_item(&mut self, item_id: ItemId) -> DomainResult<()> {
        if !self.items.remove(&item_id) {
            return Err(DomainError::not_found("item not registered in flat"));
        }
        Ok(())
    }

    /// Advance the version; called by the store when a move commits.
    pub fn advance_version(&mut self) {
        self.version += 1;
    }
}

impl AggregateRoot for Flat {
    type Id = FlatId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
