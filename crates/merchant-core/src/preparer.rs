//! Trade preparation: shop preconditions and staged container effects.
//!
//! The checks run in a fixed order and stop at the first failure:
//!
//! 1. self-trade,
//! 2. owner online,
//! 3. container missing or unreachable (container-backed shops only),
//! 4. shop-specific input checks on a working copy of the contents,
//! 5. space for what the shop receives.
//!
//! The owner rules never touch storage. Nothing is written here; the
//! session commits the staged copy later.

use merchant_trading::{
    ItemContainer, RecipeBinding, StagedContainer, TradeContext, TradeRequest, TradingConfig,
};
use merchant_types::{AbortReason, Actor, ItemStack, TradeId};

use crate::shopkeeper::Shopkeeper;

/// A matched trade waiting for preparation.
#[derive(Debug, Clone, Copy)]
pub struct PrepareRequest<'a> {
    /// Identifier assigned when the trade was matched.
    pub trade_id: TradeId,
    /// Trading actor.
    pub actor: &'a Actor,
    /// Matched recipe and slot order.
    pub binding: &'a RecipeBinding,
    /// Offered stack satisfying `item1`.
    pub offered1: &'a ItemStack,
    /// Offered stack satisfying `item2`.
    pub offered2: Option<&'a ItemStack>,
    /// 1-based attempt number within the gesture.
    pub trade_index: u32,
}

impl PrepareRequest<'_> {
    /// The context of the matched trade, with nothing staged yet.
    pub fn matched_context(&self, shop: &Shopkeeper) -> TradeContext {
        TradeContext {
            trade_id: self.trade_id,
            shopkeeper_id: shop.id(),
            actor: self.actor.clone(),
            recipe: self.binding.recipe.clone(),
            offered1: self.offered1.clone(),
            offered2: self.offered2.cloned(),
            order: self.binding.order,
            trade_index: self.trade_index,
            staged: None,
        }
    }
}

/// Run every shop precondition and stage the container effects into `ctx`.
///
/// On failure `ctx` is left without staged effects.
///
/// # Errors
///
/// Returns the [`AbortReason`] of the first failed check.
pub fn prepare(
    shop: &Shopkeeper,
    container: Option<&dyn ItemContainer>,
    ctx: &mut TradeContext,
    config: &TradingConfig,
) -> Result<(), AbortReason> {
    let strategy = shop.strategy();
    strategy.check_preconditions(&shop.profile, &ctx.actor, config)?;

    let before = if strategy.uses_container() {
        let Some(container) = container else {
            tracing::debug!(shop = %shop.profile.name, "trade prevented: container is missing");
            return Err(AbortReason::MissingContainer);
        };
        match container.read_contents() {
            Ok(contents) => Some(contents),
            Err(err) => {
                tracing::warn!(shop = %shop.profile.name, error = %err, "trade prevented: container is unreachable");
                return Err(AbortReason::MissingContainer);
            }
        }
    } else {
        None
    };

    let mut working = before.clone().unwrap_or_default();
    let trade = TradeRequest {
        actor: &ctx.actor,
        recipe: &ctx.recipe,
        offered1: &ctx.offered1,
        offered2: ctx.offered2.as_ref(),
    };
    strategy.stage_effects(&trade, &mut working, config)?;

    ctx.staged = before.map(|before| StagedContainer {
        before,
        after: working,
    });
    Ok(())
}
