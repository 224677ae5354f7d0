//! Per-trade verification of the double-entry shape.
//!
//! A well-formed trade has one or two payments from a single actor to a
//! single shop, and exactly one delivery back from that shop to that actor.
//! The ledger builds trades this way by construction; the check guards
//! against corrupted or hand-appended data.

use merchant_types::TradeId;

use crate::entry::{EntryKind, Party};
use crate::ledger::TradeLedger;

/// Result of verifying one trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeBalance {
    /// The trade's entries have the expected shape.
    Balanced,
    /// The trade was never booked.
    Unknown,
    /// The entries are malformed.
    Unbalanced {
        /// Human-readable description of the problem.
        message: String,
    },
}

/// Verify the entries booked for `trade_id`.
pub fn verify_trade(ledger: &TradeLedger, trade_id: TradeId) -> TradeBalance {
    let mut payments: Vec<(Party, Party)> = Vec::new();
    let mut deliveries: Vec<(Party, Party)> = Vec::new();
    for entry in ledger.entries_for(trade_id) {
        match entry.kind {
            EntryKind::Payment => payments.push((entry.from, entry.to)),
            EntryKind::Delivery => deliveries.push((entry.from, entry.to)),
        }
    }

    if payments.is_empty() && deliveries.is_empty() {
        return TradeBalance::Unknown;
    }
    if !(1..=2).contains(&payments.len()) {
        return unbalanced(trade_id, format!("{} payments", payments.len()));
    }
    let [(shop, actor)] = deliveries.as_slice() else {
        return unbalanced(trade_id, format!("{} deliveries", deliveries.len()));
    };
    if payments.iter().any(|(from, to)| from != actor || to != shop) {
        return unbalanced(trade_id, String::from("payment parties differ from delivery"));
    }
    TradeBalance::Balanced
}

fn unbalanced(trade_id: TradeId, problem: String) -> TradeBalance {
    tracing::error!(%trade_id, %problem, "ledger trade is unbalanced");
    TradeBalance::Unbalanced {
        message: format!("trade {trade_id}: {problem}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use merchant_types::{
        ActorId, ItemStack, ShopkeeperId, TradeCommittedDetails, TradingRecipe,
    };

    use super::*;
    use crate::entry::EntryBuilder;

    #[test]
    fn booked_trade_is_balanced() {
        let recipe =
            TradingRecipe::new(ItemStack::new("emerald", 3), None, ItemStack::new("diamond", 1))
                .unwrap();
        let details = TradeCommittedDetails {
            trade_id: TradeId::new(),
            shopkeeper_id: ShopkeeperId::new(),
            actor_id: ActorId::new(),
            paid1: recipe.item1.clone(),
            paid2: None,
            recipe,
            swapped: false,
            trade_index: 1,
        };
        let mut ledger = TradeLedger::new();
        ledger.record_committed(&details).unwrap();
        assert_eq!(verify_trade(&ledger, details.trade_id), TradeBalance::Balanced);
    }

    #[test]
    fn delivery_without_payment_is_unbalanced() {
        let trade_id = TradeId::new();
        let delivery = EntryBuilder::new(trade_id, EntryKind::Delivery)
            .from(Party::Shop(ShopkeeperId::new()))
            .to(Party::Actor(ActorId::new()))
            .item(ItemStack::new("diamond", 1))
            .build()
            .unwrap();
        let mut ledger = TradeLedger::new();
        ledger.append(delivery);
        assert!(matches!(
            verify_trade(&ledger, trade_id),
            TradeBalance::Unbalanced { .. }
        ));
    }

    #[test]
    fn unknown_trade_is_reported() {
        let ledger = TradeLedger::new();
        assert_eq!(verify_trade(&ledger, TradeId::new()), TradeBalance::Unknown);
    }
}
