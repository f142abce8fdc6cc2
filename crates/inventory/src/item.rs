use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use flatshare_core::{DomainError, DomainResult, Entity, FlatId, ItemId, Money, UserId};

use crate::ownership::OwnershipSet;

/// A shared household item (or recurring bill) located in a flat.
///
/// Items are created by the external CRUD layer; the move orchestrator only
/// ever touches their ownership set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    flat_id: FlatId,
    name: String,
    initial_value: Money,
    purchase_date: NaiveDate,
    yearly_depreciation: f64,
    minimum_value: Option<Money>,
    minimum_value_pct: Option<f64>,
    is_bill: bool,
    owners: OwnershipSet,
}

impl Item {
    /// Create a depreciable item.
    ///
    /// Validates the valuation parameters up front so a stored item can always
    /// be valued: rate and floor percentage in `[0, 1]`, non-negative initial
    /// value, absolute floor no higher than the initial value.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ItemId,
        flat_id: FlatId,
        name: impl Into<String>,
        initial_value: Money,
        purchase_date: NaiveDate,
        yearly_depreciation: f64,
        minimum_value: Option<Money>,
        minimum_value_pct: Option<f64>,
        is_bill: bool,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        if initial_value.is_negative() {
            return Err(DomainError::validation("initial value cannot be negative"));
        }
        if !(0.0..=1.0).contains(&yearly_depreciation) {
            return Err(DomainError::InvalidRate(yearly_depreciation));
        }
        if let Some(pct) = minimum_value_pct {
            if !(0.0..=1.0).contains(&pct) {
                return Err(DomainError::validation(format!(
                    "minimum value percentage {pct} is outside [0, 1]"
                )));
            }
        }
        if let Some(floor) = minimum_value {
            if floor.is_negative() || floor > initial_value {
                return Err(DomainError::validation(
                    "minimum value must be between zero and the initial value",
                ));
            }
        }
        Ok(Self {
            id,
            flat_id,
            name,
            initial_value,
            purchase_date,
            yearly_depreciation,
            minimum_value,
            minimum_value_pct,
            is_bill,
            owners: OwnershipSet::new(),
        })
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn flat_id(&self) -> FlatId {
        self.flat_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn initial_value(&self) -> Money {
        self.initial_value
    }

    pub fn purchase_date(&self) -> NaiveDate {
        self.purchase_date
    }

    pub fn yearly_depreciation(&self) -> f64 {
        self.yearly_depreciation
    }

    pub fn minimum_value(&self) -> Option<Money> {
        self.minimum_value
    }

    pub fn minimum_value_pct(&self) -> Option<f64> {
        self.minimum_value_pct
    }

    pub fn is_bill(&self) -> bool {
        self.is_bill
    }

    pub fn owners(&self) -> &OwnershipSet {
        &self.owners
    }

    /// Add a co-owner (fails with `AlreadyOwner` on duplicates).
    pub fn add_owner(&mut self, user_id: UserId) -> DomainResult<()> {
        self.owners.add(user_id)
    }

    /// Remove a co-owner (fails with `NotOwner` if absent).
    pub fn remove_owner(&mut self, user_id: UserId) -> DomainResult<()> {
        self.owners.remove(user_id)
    }

    /// Replace the whole ownership set (item creation: "owned by all current
    /// residents").
    pub fn set_owners(&mut self, owners: OwnershipSet) {
        self.owners = owners;
    }

    /// Current worth at `as_of` (see [`crate::valuation::current_value`]).
    pub fn value_at(&self, as_of: NaiveDate) -> DomainResult<Money> {
        crate::valuation::current_value(self, as_of)
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
