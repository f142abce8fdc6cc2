use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use flatshare_accounting::{settle_buy_in, settle_buy_out, LedgerEntry};
use flatshare_core::{
    AggregateRoot, DomainError, DomainResult, ExpectedVersion, FlatId, ItemId, UserId,
};
use flatshare_inventory::Item;
use flatshare_parties::{Flat, User};

/// Command: move a user into a flat, buying into every non-excluded item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIn {
    pub flat_id: FlatId,
    pub user_id: UserId,
    pub exclude_items: BTreeSet<ItemId>,
    pub effective_date: NaiveDate,
}

/// Command: move a user out of a flat, buying them out of every item they
/// co-own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOut {
    pub flat_id: FlatId,
    pub user_id: UserId,
    pub effective_date: NaiveDate,
}

/// One item touched by a move: its post-move state and the settlement batch
/// that justifies the change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemChange {
    pub item: Item,
    pub entries: Vec<LedgerEntry>,
}

/// The complete, not-yet-committed outcome of a move transaction.
///
/// Holds post-move snapshots of every touched entity plus the state the plan
/// was computed from: the flat version, and the user's full pre-move snapshot.
/// The store refuses to commit a plan if either has changed since — the flat
/// version covers concurrent moves on the *same* flat, while the user snapshot
/// covers the user being shared state between flats (two cross-flat move-ins
/// of the same user must not both commit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovePlan {
    pub flat: Flat,
    pub user: User,
    /// The user exactly as observed when planning; stale if the stored user
    /// differs at commit time.
    pub prior_user: User,
    pub item_changes: Vec<ItemChange>,
    pub planned_at_version: u64,
}

impl MovePlan {
    pub fn expected_version(&self) -> ExpectedVersion {
        ExpectedVersion::Exact(self.planned_at_version)
    }

    /// All entries of the plan, in per-item batch order.
    pub fn entries(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.item_changes.iter().flat_map(|c| c.entries.iter())
    }
}

fn ensure_targets(flat: &Flat, user: &User, flat_id: FlatId, user_id: UserId) -> DomainResult<()> {
    if flat.id_typed() != flat_id {
        return Err(DomainError::validation("command targets a different flat"));
    }
    if user.id_typed() != user_id {
        return Err(DomainError::validation("command targets a different user"));
    }
    Ok(())
}

fn ensure_items_belong(flat: &Flat, items: &[Item]) -> DomainResult<()> {
    for item in items {
        if item.flat_id() != flat.id_typed() || !flat.has_item(item.id_typed()) {
            return Err(DomainError::invariant(format!(
                "item {} is not registered in flat {}",
                item.id_typed(),
                flat.id_typed()
            )));
        }
    }
    Ok(())
}

/// Plan a move-in: Validate → AttachUser → PerEvaluation.
///
/// `items` must be the flat's full item list. Every item not named in the
/// exclusion list is settled with [`settle_buy_in`] and gains the user as a
/// co-owner. Fails with `AlreadyHoused` when the user already lives somewhere,
/// and rejects exclusion ids that are not items of this flat.
pub fn plan_move_in(
    flat: &Flat,
    user: &User,
    items: &[Item],
    cmd: &MoveIn,
) -> DomainResult<MovePlan> {
    ensure_targets(flat, user, cmd.flat_id, cmd.user_id)?;
    ensure_items_belong(flat, items)?;
    for excluded in &cmd.exclude_items {
        if !flat.has_item(*excluded) {
            return Err(DomainError::validation(format!(
                "excluded item {excluded} is not in the flat"
            )));
        }
    }

    let mut new_user = user.clone();
    new_user.attach_to_flat(flat.id_typed())?;

    let mut new_flat = flat.clone();
    new_flat.add_resident(cmd.user_id)?;

    let mut item_changes = Vec::new();
    for item in items {
        if cmd.exclude_items.contains(&item.id_typed()) {
            continue;
        }
        let entries = settle_buy_in(item, cmd.user_id, cmd.effective_date)?;
        let mut new_item = item.clone();
        new_item.add_owner(cmd.user_id)?;
        new_user.add_item(item.id_typed())?;
        item_changes.push(ItemChange {
            item: new_item,
            entries,
        });
    }

    Ok(MovePlan {
        flat: new_flat,
        user: new_user,
        prior_user: user.clone(),
        item_changes,
        planned_at_version: flat.version(),
    })
}

/// Plan a move-out: Validate → PerEvaluation → DetachUser.
///
/// Settles every item the user currently co-owns with [`settle_buy_out`] and
/// removes the user from its ownership set, then clears the user's residency.
/// Fails with `NotResident` when the user does not live in this flat and
/// `LastResident` when the flat would be left empty. An item the leaver owned
/// alone is left with an empty owner set (its batch is the lone unbalanced
/// credit): the remaining residents chose not to buy in, so nobody owes for
/// it until someone does.
pub fn plan_move_out(
    flat: &Flat,
    user: &User,
    items: &[Item],
    cmd: &MoveOut,
) -> DomainResult<MovePlan> {
    ensure_targets(flat, user, cmd.flat_id, cmd.user_id)?;
    ensure_items_belong(flat, items)?;
    if !user.is_resident_of(flat.id_typed()) || !flat.has_resident(cmd.user_id) {
        return Err(DomainError::NotResident);
    }

    let mut new_flat = flat.clone();
    new_flat.remove_resident(cmd.user_id)?;

    let mut new_user = user.clone();
    let mut item_changes = Vec::new();
    for item in items {
        if !item.owners().contains(cmd.user_id) {
            continue;
        }
        let entries = settle_buy_out(item, cmd.user_id, cmd.effective_date)?;
        let mut new_item = item.clone();
        new_item.remove_owner(cmd.user_id)?;
        new_user.remove_item(item.id_typed())?;
        item_changes.push(ItemChange {
            item: new_item,
            entries,
        });
    }
    new_user.detach_from_flat()?;

    Ok(MovePlan {
        flat: new_flat,
        user: new_user,
        prior_user: user.clone(),
        item_changes,
        planned_at_version: flat.version(),
    })
}
