//! The per-attempt trade context.
//!
//! A [`TradeContext`] is built when a trade is matched and receives its
//! staged container effects from the preparer. It is never reused across
//! attempts; the session consumes it when the attempt is applied or
//! aborted.

use merchant_types::{
    AbortReason, Actor, ItemStack, PendingTradeSummary, ShopkeeperId, SlotOrder,
    TradeAbortedDetails, TradeCommittedDetails, TradeId, TradingRecipe,
};

/// A container snapshot and the staged contents to write on commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedContainer {
    /// Contents read before staging, used for rollback.
    pub before: Vec<Option<ItemStack>>,
    /// Contents after applying the trade's container effects.
    pub after: Vec<Option<ItemStack>>,
}

impl StagedContainer {
    /// Whether staging changed anything.
    pub fn is_changed(&self) -> bool {
        self.before != self.after
    }
}

/// Everything known about one trade attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeContext {
    /// Identifier of this attempt.
    pub trade_id: TradeId,
    /// Shop being traded with.
    pub shopkeeper_id: ShopkeeperId,
    /// Trading actor.
    pub actor: Actor,
    /// The matched recipe.
    pub recipe: TradingRecipe,
    /// Offered stack satisfying `item1`, as placed in the window.
    pub offered1: ItemStack,
    /// Offered stack satisfying `item2`, as placed in the window.
    pub offered2: Option<ItemStack>,
    /// How the offered stacks line up with the recipe.
    pub order: SlotOrder,
    /// 1-based attempt number within the triggering gesture.
    pub trade_index: u32,
    /// Staged container effects, for container-backed shops.
    pub staged: Option<StagedContainer>,
}

impl TradeContext {
    /// The offered stacks truncated or expanded to the recipe quantities.
    pub fn paid(&self) -> (ItemStack, Option<ItemStack>) {
        let paid1 = self.offered1.with_amount(self.recipe.item1.amount);
        let paid2 = match (&self.offered2, &self.recipe.item2) {
            (Some(offered), Some(required)) => Some(offered.with_amount(required.amount)),
            _ => None,
        };
        (paid1, paid2)
    }

    /// What remains in the two offered slots after the trade, in window
    /// slot order.
    pub fn remaining_offered(&self) -> (Option<ItemStack>, Option<ItemStack>) {
        let left1 = self.offered1.decreased_by(self.recipe.item1.amount);
        let left2 = self
            .offered2
            .as_ref()
            .and_then(|s| s.decreased_by(self.recipe.item2_amount()));
        match self.order {
            SlotOrder::AsIs => (left1, left2),
            SlotOrder::Swapped => (left2, left1),
        }
    }

    /// The immutable summary handed to the veto hook.
    pub fn summary(&self) -> PendingTradeSummary {
        let (offered1, offered2) = self.paid();
        PendingTradeSummary {
            trade_id: self.trade_id,
            shopkeeper_id: self.shopkeeper_id,
            actor: self.actor.clone(),
            recipe: self.recipe.clone(),
            offered1,
            offered2,
            swapped: self.order.is_swapped(),
        }
    }

    /// Notification payload for a committed attempt.
    pub fn committed_details(&self) -> TradeCommittedDetails {
        let (paid1, paid2) = self.paid();
        TradeCommittedDetails {
            trade_id: self.trade_id,
            shopkeeper_id: self.shopkeeper_id,
            actor_id: self.actor.id,
            recipe: self.recipe.clone(),
            paid1,
            paid2,
            swapped: self.order.is_swapped(),
            trade_index: self.trade_index,
        }
    }

    /// Notification payload for an aborted attempt.
    pub fn aborted_details(&self, reason: AbortReason) -> TradeAbortedDetails {
        TradeAbortedDetails {
            trade_id: Some(self.trade_id),
            shopkeeper_id: self.shopkeeper_id,
            actor_id: self.actor.id,
            reason,
        }
    }
}
