use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use flatshare_core::{DomainError, DomainResult, EntryId, ItemId, Money, UserId};

/// Which side of a membership change produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    BuyIn,
    BuyOut,
}

/// One immutable settlement record.
///
/// Sign convention: positive = owed *by* the user (debit), negative = owed
/// *to* the user (credit). Entries are never updated or deleted once posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub item_id: ItemId,
    pub amount: Money,
    pub effective_date: NaiveDate,
    pub kind: EntryKind,
}

impl LedgerEntry {
    pub fn new(
        user_id: UserId,
        item_id: ItemId,
        amount: Money,
        effective_date: NaiveDate,
        kind: EntryKind,
    ) -> Self {
        Self {
            id: EntryId::new(),
            user_id,
            item_id,
            amount,
            effective_date,
            kind,
        }
    }
}

/// Append-only settlement journal.
///
/// The journal does not hold balances as state; balances are derived by
/// summing entries. There is deliberately no API to modify or remove an entry
/// once it is posted — the journal is the audit trail that justifies every
/// ownership change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    entries: Vec<LedgerEntry>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a settlement batch without appending it.
    ///
    /// A batch is the set of entries generated by one membership change on one
    /// item, so it must name a single item, kind and date, and it must net to
    /// zero. Single-entry batches are exempt from the zero-sum check: they are
    /// the degenerate cases (zero-amount buy-in to an unowned item, sole-owner
    /// buy-out).
    pub fn validate_batch(batch: &[LedgerEntry]) -> DomainResult<()> {
        let Some(first) = batch.first() else {
            return Err(DomainError::validation("settlement batch must have entries"));
        };

        for entry in batch {
            if entry.item_id != first.item_id {
                return Err(DomainError::validation("batch spans multiple items"));
            }
            if entry.kind != first.kind {
                return Err(DomainError::validation("batch mixes entry kinds"));
            }
            if entry.effective_date != first.effective_date {
                return Err(DomainError::validation("batch spans multiple dates"));
            }
        }

        if batch.len() > 1 {
            let net = Money::total(batch.iter().map(|e| e.amount));
            if net != Money::ZERO {
                return Err(DomainError::invariant(format!(
                    "settlement entries must net to zero (got {net})"
                )));
            }
        }

        Ok(())
    }

    /// Post one settlement batch (validates, then appends).
    pub fn post(&mut self, batch: Vec<LedgerEntry>) -> DomainResult<()> {
        Self::validate_batch(&batch)?;
        self.entries.extend(batch);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn entries_for_user(&self, user_id: UserId) -> Vec<&LedgerEntry> {
        self.entries.iter().filter(|e| e.user_id == user_id).collect()
    }

    pub fn entries_for_item(&self, item_id: ItemId) -> Vec<&LedgerEntry> {
        self.entries.iter().filter(|e| e.item_id == item_id).collect()
    }

    /// Entries with an effective date in `[from, to]`.
    pub fn entries_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<&LedgerEntry> {
        self.entries
            .iter()
            .filter(|e| e.effective_date >= from && e.effective_date <= to)
            .collect()
    }

    /// Net amount the user owes (positive) or is owed (negative).
    pub fn balance_for_user(&self, user_id: UserId) -> Money {
        Money::total(
            self.entries
                .iter()
                .filter(|e| e.user_id == user_id)
                .map(|e| e.amount),
        )
    }
}
