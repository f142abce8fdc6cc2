use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use flatshare_core::{DomainError, DomainResult, Entity, FlatId, ItemId, UserId};

/// A person who may reside in (at most) one flat and co-own its items.
///
/// `items` is the derived view of which ownership sets contain this user; the
/// move orchestrator keeps it in lockstep with the items themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    first_name: String,
    last_name: String,
    email: String,
    flat_id: Option<FlatId>,
    items: BTreeSet<ItemId>,
}

impl User {
    pub fn new(
        id: UserId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> DomainResult<Self> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        let email = email.into();
        if first_name.trim().is_empty() || last_name.trim().is_empty() {
            return Err(DomainError::validation("user name cannot be empty"));
        }
        if !email.contains('@') {
            return Err(DomainError::validation("email must contain '@'"));
        }
        Ok(Self {
            id,
            first_name,
            last_name,
            email,
            flat_id: None,
            items: BTreeSet::new(),
        })
    }

    pub fn id_typed(&self) -> UserId {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn flat_id(&self) -> Option<FlatId> {
        self.flat_id
    }

    pub fn items(&self) -> &BTreeSet<ItemId> {
        &self.items
    }

    pub fn is_resident_of(&self, flat_id: FlatId) -> bool {
        self.flat_id == Some(flat_id)
    }

    /// Take up residency. Fails with `AlreadyHoused` if the user currently
    /// lives anywhere (a user resides in at most one flat at a time).
    pub fn attach_to_flat(&mut self, flat_id: FlatId) -> DomainResult<()> {
        if self.flat_id.is_some() {
            return Err(DomainError::AlreadyHoused);
        }
        self.flat_id = Some(flat_id);
        Ok(())
    }

    /// End residency: clears the flat reference and the owned-items view.
    ///
    /// Leaving a flat co-owning zero items is the required post-condition of a
    /// completed move-out.
    pub fn detach_from_flat(&mut self) -> DomainResult<()> {
        if self.flat_id.is_none() {
            return Err(DomainError::NotResident);
        }
        self.flat_id = None;
        self.items.clear();
        Ok(())
    }

    /// Record co-ownership of an item (mirror of `OwnershipSet::add`).
    pub fn add_item(&mut self, item_id: ItemId) -> DomainResult<()> {
        if !self.items.insert(item_id) {
            return Err(DomainError::AlreadyOwner);
        }
        Ok(())
    }

    /// Drop co-ownership of an item (mirror of `OwnershipSet::remove`).
    pub fn remove_item(&mut self, item_id: ItemId) -> DomainResult<()> {
        if !self.items.remove(&item_id) {
            return Err(DomainError::NotOwner);
        }
        Ok(())
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(UserId::new(), "Yann", "Wallis", "y.w@example.org").unwrap()
    }

    #[test]
    fn attaching_twice_is_rejected() {
        let mut u = user();
        u.attach_to_flat(FlatId::new()).unwrap();
        assert_eq!(
            u.attach_to_flat(FlatId::new()).unwrap_err(),
            DomainError::AlreadyHoused
        );
    }

    #[test]
    fn detach_clears_flat_and_items() {
        let mut u = user();
        u.attach_to_flat(FlatId::new()).unwrap();
        u.add_item(ItemId::new()).unwrap();
        u.detach_from_flat().unwrap();
        assert_eq!(u.flat_id(), None);
        assert!(u.items().is_empty());
    }

    #[test]
    fn detaching_a_homeless_user_is_rejected() {
        let mut u = user();
        assert_eq!(u.detach_from_flat().unwrap_err(), DomainError::NotResident);
    }

    #[test]
    fn rejects_invalid_email() {
        let err = User::new(UserId::new(), "Yann", "Wallis", "nope").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
