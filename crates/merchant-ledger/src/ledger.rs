//! The trade ledger: an append-only log of committed trades.
//!
//! # Design
//!
//! - **Append-only**: entries are never modified or deleted.
//! - **Double-entry**: every trade books payments and a delivery.
//! - **Idempotent per trade**: a trade id is booked at most once.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use merchant_types::{
    AbortReason, TradeAbortedDetails, TradeCommittedDetails, TradeEvent, TradeId,
};

use crate::entry::{EntryBuilder, EntryKind, LedgerEntry, Party};
use crate::LedgerError;

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Aggregate statistics over the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    /// Number of committed trades.
    pub committed_trades: u64,
    /// Items paid by actors, per item type.
    pub paid: BTreeMap<String, u64>,
    /// Items delivered by shops, per item type.
    pub delivered: BTreeMap<String, u64>,
    /// Aborted attempts, per reason tag.
    pub aborted: BTreeMap<String, u64>,
    /// Number of recipe refresh notifications.
    pub recipe_refreshes: u64,
}

fn add_to(totals: &mut BTreeMap<String, u64>, key: &str, amount: u64) {
    let total = totals.entry(key.to_owned()).or_insert(0);
    *total = total.saturating_add(amount);
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Append-only record of committed trades and abort tallies.
#[derive(Debug, Default)]
pub struct TradeLedger {
    /// All entries, in insertion order.
    entries: Vec<LedgerEntry>,
    /// Trades booked so far.
    trades: BTreeSet<TradeId>,
    /// Aborted attempts per reason.
    aborts: BTreeMap<AbortReason, u64>,
    /// Recipe refresh notifications seen.
    recipe_refreshes: u64,
}

impl TradeLedger {
    /// Create a new empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in the ledger.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger has no entries.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Entries booked for `trade_id`.
    pub fn entries_for(&self, trade_id: TradeId) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter().filter(move |e| e.trade_id == trade_id)
    }

    /// Number of aborted attempts recorded for `reason`.
    pub fn abort_count(&self, reason: AbortReason) -> u64 {
        self.aborts.get(&reason).copied().unwrap_or(0)
    }

    /// Append a pre-built [`LedgerEntry`], for example one restored from an
    /// export. For new trades prefer [`TradeLedger::record_committed`].
    pub fn append(&mut self, entry: LedgerEntry) {
        self.trades.insert(entry.trade_id);
        self.entries.push(entry);
    }

    /// Book a committed trade.
    ///
    /// All entries are validated before any is appended, so a failed call
    /// leaves the ledger unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateTrade`] if the trade was already
    /// booked, or the builder's validation error.
    pub fn record_committed(&mut self, details: &TradeCommittedDetails) -> Result<(), LedgerError> {
        if self.trades.contains(&details.trade_id) {
            return Err(LedgerError::DuplicateTrade(details.trade_id));
        }
        let actor = Party::Actor(details.actor_id);
        let shop = Party::Shop(details.shopkeeper_id);

        let mut staged = Vec::with_capacity(3);
        for paid in std::iter::once(&details.paid1).chain(details.paid2.as_ref()) {
            staged.push(
                EntryBuilder::new(details.trade_id, EntryKind::Payment)
                    .from(actor)
                    .to(shop)
                    .item(paid.clone())
                    .build()?,
            );
        }
        staged.push(
            EntryBuilder::new(details.trade_id, EntryKind::Delivery)
                .from(shop)
                .to(actor)
                .item(details.recipe.result.clone())
                .build()?,
        );

        self.entries.extend(staged);
        self.trades.insert(details.trade_id);
        tracing::debug!(
            trade_id = %details.trade_id,
            recipe = %details.recipe.describe(),
            "trade booked"
        );
        Ok(())
    }

    /// Tally an aborted attempt.
    pub fn record_aborted(&mut self, details: &TradeAbortedDetails) {
        let count = self.aborts.entry(details.reason).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Record any engine notification.
    ///
    /// # Errors
    ///
    /// Propagates [`TradeLedger::record_committed`] errors.
    pub fn record_event(&mut self, event: &TradeEvent) -> Result<(), LedgerError> {
        match event {
            TradeEvent::Committed(details) => self.record_committed(details),
            TradeEvent::Aborted(details) => {
                self.record_aborted(details);
                Ok(())
            }
            TradeEvent::RecipesChanged { .. } => {
                self.recipe_refreshes = self.recipe_refreshes.saturating_add(1);
                Ok(())
            }
        }
    }

    /// Aggregate statistics.
    pub fn summary(&self) -> LedgerSummary {
        let mut summary = LedgerSummary {
            committed_trades: u64::try_from(self.trades.len()).unwrap_or(u64::MAX),
            recipe_refreshes: self.recipe_refreshes,
            ..LedgerSummary::default()
        };
        for entry in &self.entries {
            let totals = match entry.kind {
                EntryKind::Payment => &mut summary.paid,
                EntryKind::Delivery => &mut summary.delivered,
            };
            add_to(totals, &entry.item.item_type, u64::from(entry.item.amount));
        }
        for (reason, count) in &self.aborts {
            add_to(&mut summary.aborted, reason.tag(), *count);
        }
        summary
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use merchant_types::{ActorId, ItemStack, ShopkeeperId, TradingRecipe};

    use super::*;

    fn committed() -> TradeCommittedDetails {
        let recipe = TradingRecipe::new(
            ItemStack::new("emerald_block", 2),
            Some(ItemStack::new("emerald", 4)),
            ItemStack::new("diamond", 1),
        )
        .unwrap();
        TradeCommittedDetails {
            trade_id: TradeId::new(),
            shopkeeper_id: ShopkeeperId::new(),
            actor_id: ActorId::new(),
            paid1: recipe.item1.clone(),
            paid2: recipe.item2.clone(),
            recipe,
            swapped: false,
            trade_index: 1,
        }
    }

    #[test]
    fn committed_trade_books_payments_and_delivery() {
        let mut ledger = TradeLedger::new();
        let details = committed();
        ledger.record_committed(&details).unwrap();
        assert_eq!(ledger.len(), 3);
        let kinds: Vec<EntryKind> = ledger.entries_for(details.trade_id).map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EntryKind::Payment, EntryKind::Payment, EntryKind::Delivery]
        );
    }

    #[test]
    fn duplicate_trade_is_rejected() {
        let mut ledger = TradeLedger::new();
        let details = committed();
        ledger.record_committed(&details).unwrap();
        assert_eq!(
            ledger.record_committed(&details),
            Err(LedgerError::DuplicateTrade(details.trade_id))
        );
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn summary_aggregates_events() {
        let mut ledger = TradeLedger::new();
        let details = committed();
        ledger
            .record_event(&TradeEvent::Committed(details.clone()))
            .unwrap();
        ledger
            .record_event(&TradeEvent::Aborted(TradeAbortedDetails {
                trade_id: None,
                shopkeeper_id: details.shopkeeper_id,
                actor_id: details.actor_id,
                reason: AbortReason::InsufficientStock,
            }))
            .unwrap();
        ledger
            .record_event(&TradeEvent::RecipesChanged {
                shopkeeper_id: details.shopkeeper_id,
                actor_id: details.actor_id,
            })
            .unwrap();

        let summary = ledger.summary();
        assert_eq!(summary.committed_trades, 1);
        assert_eq!(summary.paid.get("emerald"), Some(&4));
        assert_eq!(summary.delivered.get("diamond"), Some(&1));
        assert_eq!(summary.aborted.get("insufficient-stock"), Some(&1));
        assert_eq!(summary.recipe_refreshes, 1);
        assert_eq!(ledger.abort_count(AbortReason::InsufficientStock), 1);
        assert_eq!(ledger.abort_count(AbortReason::Vetoed), 0);
    }

    #[test]
    fn summary_serializes_for_reports() {
        let mut ledger = TradeLedger::new();
        ledger.record_committed(&committed()).unwrap();

        let json = serde_json::to_value(ledger.summary()).unwrap();

        assert_eq!(json["committed_trades"], 1);
        assert_eq!(json["paid"]["emerald_block"], 2);
        assert_eq!(json["delivered"]["diamond"], 1);
        assert_eq!(json["aborted"], serde_json::json!({}));
    }
}
