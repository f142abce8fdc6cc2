//! Per-item co-ownership set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use flatshare_core::{DomainError, DomainResult, UserId};

/// The set of users who jointly own (and are financially responsible for) one
/// item.
///
/// Backed by a `BTreeSet` so iteration order is deterministic, which keeps
/// settlement entry order stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnershipSet {
    owners: BTreeSet<UserId>,
}

impl OwnershipSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from an initial group of owners (e.g. a flat's residents at
    /// item creation).
    pub fn from_owners(owners: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            owners: owners.into_iter().collect(),
        }
    }

    pub fn count(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn contains(&self, user_id: UserId) -> bool {
        self.owners.contains(&user_id)
    }

    /// Each owner's fractional share (`1/n`), or `None` for an ownerless item.
    pub fn share_fraction(&self) -> Option<f64> {
        if self.owners.is_empty() {
            None
        } else {
            Some(1.0 / self.owners.len() as f64)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = UserId> + '_ {
        self.owners.iter().copied()
    }

    /// Add a co-owner. Fails if the user already owns the item.
    pub fn add(&mut self, user_id: UserId) -> DomainResult<()> {
        if !self.owners.insert(user_id) {
            return Err(DomainError::AlreadyOwner);
        }
        Ok(())
    }

    /// Remove a co-owner. Fails if the user does not own the item.
    ///
    /// Removing the last owner yields an empty set; whether that is acceptable
    /// is the caller's call (item retirement vs. orphaning).
    pub fn remove(&mut self, user_id: UserId) -> DomainResult<()> {
        if !self.owners.remove(&user_id) {
            return Err(DomainError::NotOwner);
        }
        Ok(())
    }
}
