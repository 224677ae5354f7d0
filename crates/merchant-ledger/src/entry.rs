//! Ledger entries and their validating builder.
//!
//! An [`EntryBuilder`] enforces the double-entry contract: every entry has a
//! source and a destination party of the kinds its [`EntryKind`] expects,
//! and moves a non-empty item stack.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use merchant_types::{ActorId, ItemStack, LedgerEntryId, ShopkeeperId, TradeId};

use crate::LedgerError;

// ---------------------------------------------------------------------------
// Entry data
// ---------------------------------------------------------------------------

/// Direction of an item movement within a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Items the actor paid to the shop.
    Payment,
    /// Items the shop delivered to the actor.
    Delivery,
}

/// One side of an item movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Party {
    /// A trading actor.
    Actor(ActorId),
    /// A shop.
    Shop(ShopkeeperId),
}

impl Party {
    /// Short name of the party kind, for error messages.
    pub const fn kind_name(self) -> &'static str {
        match self {
            Self::Actor(_) => "actor",
            Self::Shop(_) => "shop",
        }
    }
}

/// A single booked item movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Entry identifier.
    pub id: LedgerEntryId,
    /// The trade this entry belongs to.
    pub trade_id: TradeId,
    /// Direction of the movement.
    pub kind: EntryKind,
    /// Party losing the items.
    pub from: Party,
    /// Party receiving the items.
    pub to: Party,
    /// The moved items.
    pub item: ItemStack,
    /// When the entry was booked.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for validated [`LedgerEntry`] values.
///
/// # Examples
///
/// ```
/// use merchant_ledger::{EntryBuilder, EntryKind, Party};
/// use merchant_types::{ActorId, ItemStack, ShopkeeperId, TradeId};
///
/// let entry = EntryBuilder::new(TradeId::new(), EntryKind::Payment)
///     .from(Party::Actor(ActorId::new()))
///     .to(Party::Shop(ShopkeeperId::new()))
///     .item(ItemStack::new("emerald", 3))
///     .build();
///
/// assert!(entry.is_ok());
/// ```
#[derive(Debug)]
pub struct EntryBuilder {
    trade_id: TradeId,
    kind: EntryKind,
    from: Option<Party>,
    to: Option<Party>,
    item: Option<ItemStack>,
}

impl EntryBuilder {
    /// Start building an entry of `kind` for `trade_id`.
    pub const fn new(trade_id: TradeId, kind: EntryKind) -> Self {
        Self {
            trade_id,
            kind,
            from: None,
            to: None,
            item: None,
        }
    }

    /// Set the party losing the items.
    #[must_use]
    pub const fn from(mut self, party: Party) -> Self {
        self.from = Some(party);
        self
    }

    /// Set the party receiving the items.
    #[must_use]
    pub const fn to(mut self, party: Party) -> Self {
        self.to = Some(party);
        self
    }

    /// Set the moved items.
    #[must_use]
    pub fn item(mut self, item: ItemStack) -> Self {
        self.item = Some(item);
        self
    }

    /// Validate inputs and produce a [`LedgerEntry`].
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::MissingField`] if a field is not set,
    /// [`LedgerError::ZeroAmount`] for an empty stack, and
    /// [`LedgerError::InvalidParty`] if the parties do not fit the kind.
    pub fn build(self) -> Result<LedgerEntry, LedgerError> {
        let from = self.from.ok_or(LedgerError::MissingField("from"))?;
        let to = self.to.ok_or(LedgerError::MissingField("to"))?;
        let item = self.item.ok_or(LedgerError::MissingField("item"))?;

        if item.is_empty() {
            return Err(LedgerError::ZeroAmount);
        }
        validate_parties(self.kind, from, to)?;

        Ok(LedgerEntry {
            id: LedgerEntryId::new(),
            trade_id: self.trade_id,
            kind: self.kind,
            from,
            to,
            item,
            created_at: Utc::now(),
        })
    }
}

/// Validate that the parties match the contract of `kind`.
fn validate_parties(kind: EntryKind, from: Party, to: Party) -> Result<(), LedgerError> {
    let (expected_from, expected_to) = match kind {
        EntryKind::Payment => ("actor", "shop"),
        EntryKind::Delivery => ("shop", "actor"),
    };
    if from.kind_name() != expected_from {
        return Err(LedgerError::InvalidParty {
            kind,
            side: "from",
            expected: expected_from,
            actual: from.kind_name(),
        });
    }
    if to.kind_name() != expected_to {
        return Err(LedgerError::InvalidParty {
            kind,
            side: "to",
            expected: expected_to,
            actual: to.kind_name(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_must_come_from_the_shop() {
        let result = EntryBuilder::new(TradeId::new(), EntryKind::Delivery)
            .from(Party::Actor(ActorId::new()))
            .to(Party::Actor(ActorId::new()))
            .item(ItemStack::new("diamond", 1))
            .build();
        assert!(matches!(
            result,
            Err(LedgerError::InvalidParty { side: "from", .. })
        ));
    }

    #[test]
    fn empty_stacks_are_rejected() {
        let result = EntryBuilder::new(TradeId::new(), EntryKind::Payment)
            .from(Party::Actor(ActorId::new()))
            .to(Party::Shop(ShopkeeperId::new()))
            .item(ItemStack::new("emerald", 0))
            .build();
        assert_eq!(result, Err(LedgerError::ZeroAmount));
    }

    #[test]
    fn missing_fields_are_reported() {
        let result = EntryBuilder::new(TradeId::new(), EntryKind::Payment)
            .from(Party::Actor(ActorId::new()))
            .build();
        assert_eq!(result, Err(LedgerError::MissingField("to")));
    }
}
