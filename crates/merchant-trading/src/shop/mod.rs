//! Shop strategies.
//!
//! Each shop type is a value implementing [`ShopStrategy`]. The preparer
//! calls the strategy in a fixed order:
//!
//! 1. [`ShopStrategy::check_preconditions`] (owner rules, no storage access),
//! 2. the container read (container-backed shops only),
//! 3. [`ShopStrategy::stage_effects`] on a working copy of the contents.
//!
//! The session later writes the staged copy through
//! [`ShopStrategy::commit_effects`] and runs exactly one of the two hooks.

pub mod admin;
pub mod book;
pub mod buying;
pub mod selling;
pub mod trading;

use merchant_types::{
    AbortReason, Actor, ItemStack, ShopOwner, ShopType, ShopkeeperId, TradingRecipe,
};
use serde::{Deserialize, Serialize};

use crate::config::{CurrencyConfig, TradingConfig};
use crate::container::ItemContainer;
use crate::context::TradeContext;
use crate::error::StorageError;
use crate::offers::{BookOffer, PriceOffer, TradeOffer};

pub use admin::AdminShop;
pub use book::BookShop;
pub use buying::BuyingShop;
pub use selling::SellingShop;
pub use trading::TradingShop;

/// Identity and ownership of a shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopProfile {
    /// Shopkeeper identifier.
    #[serde(default)]
    pub id: ShopkeeperId,
    /// Display name, used in logs.
    pub name: String,
    /// Owner of a player shop; `None` for admin shops.
    #[serde(default)]
    pub owner: Option<ShopOwner>,
}

/// The matched trade as seen by [`ShopStrategy::stage_effects`].
#[derive(Debug, Clone, Copy)]
pub struct TradeRequest<'a> {
    /// Trading actor.
    pub actor: &'a Actor,
    /// Matched recipe.
    pub recipe: &'a TradingRecipe,
    /// Offered stack satisfying `item1`.
    pub offered1: &'a ItemStack,
    /// Offered stack satisfying `item2`.
    pub offered2: Option<&'a ItemStack>,
}

impl TradeRequest<'_> {
    /// The offered stacks at the recipe quantities: what the shop receives.
    pub fn received(&self) -> (ItemStack, Option<ItemStack>) {
        let first = self.offered1.with_amount(self.recipe.item1.amount);
        let second = match (self.offered2, &self.recipe.item2) {
            (Some(offered), Some(required)) => Some(offered.with_amount(required.amount)),
            _ => None,
        };
        (first, second)
    }
}

/// Shop-type specific trading behavior.
pub trait ShopStrategy {
    /// The kind of shop.
    fn shop_type(&self) -> ShopType;

    /// Whether the shop is backed by an external container.
    fn uses_container(&self) -> bool {
        self.shop_type().uses_container()
    }

    /// Project the shop's offers into recipes.
    ///
    /// `stock` is a snapshot of the container contents, `None` when the
    /// container is missing. Player shops flag recipes they cannot supply as
    /// out of stock.
    fn trading_recipes(
        &self,
        currency: &CurrencyConfig,
        stock: Option<&[Option<ItemStack>]>,
    ) -> Vec<TradingRecipe>;

    /// Checks that run before any container access.
    ///
    /// # Errors
    ///
    /// Returns the [`AbortReason`] of the first failed check.
    fn check_preconditions(
        &self,
        profile: &ShopProfile,
        actor: &Actor,
        config: &TradingConfig,
    ) -> Result<(), AbortReason> {
        check_owner_rules(profile, actor, config)
    }

    /// Apply the trade's container effects to `working`.
    ///
    /// `working` starts as a copy of the container contents. Shops without a
    /// container receive an empty slice and must not touch it.
    ///
    /// # Errors
    ///
    /// Returns the [`AbortReason`] of the first failed shop check.
    fn stage_effects(
        &self,
        request: &TradeRequest<'_>,
        working: &mut Vec<Option<ItemStack>>,
        config: &TradingConfig,
    ) -> Result<(), AbortReason>;

    /// Write the staged contents to the container.
    ///
    /// # Errors
    ///
    /// Propagates the container's write failure.
    fn commit_effects(
        &self,
        ctx: &TradeContext,
        container: Option<&mut dyn ItemContainer>,
    ) -> Result<(), StorageError> {
        match (&ctx.staged, container) {
            (Some(staged), Some(container)) if staged.is_changed() => {
                container.write_contents(staged.after.clone())
            }
            _ => Ok(()),
        }
    }

    /// Restore the container snapshot taken before staging.
    ///
    /// # Errors
    ///
    /// Propagates the container's write failure.
    fn rollback_effects(
        &self,
        ctx: &TradeContext,
        container: Option<&mut dyn ItemContainer>,
    ) -> Result<(), StorageError> {
        match (&ctx.staged, container) {
            (Some(staged), Some(container)) if staged.is_changed() => {
                container.write_contents(staged.before.clone())
            }
            _ => Ok(()),
        }
    }

    /// Runs once after the trade was applied.
    fn on_trade_applied(&mut self, ctx: &TradeContext) {
        tracing::trace!(trade_id = %ctx.trade_id, "trade applied");
    }

    /// Runs once after a prepared trade was aborted.
    fn on_trade_aborted(&mut self, ctx: &TradeContext, reason: AbortReason) {
        tracing::trace!(trade_id = %ctx.trade_id, %reason, "trade aborted");
    }
}

/// The owner rules shared by every player shop.
///
/// # Errors
///
/// Returns [`AbortReason::SelfTrade`] or [`AbortReason::OwnerOnline`].
pub fn check_owner_rules(
    profile: &ShopProfile,
    actor: &Actor,
    config: &TradingConfig,
) -> Result<(), AbortReason> {
    let Some(owner) = &profile.owner else {
        return Ok(());
    };
    if actor.can_bypass {
        return Ok(());
    }
    let is_owner = owner.id == actor.id;
    if config.prevent_trading_with_own_shop && is_owner {
        tracing::debug!(actor = %actor.name, shop = %profile.name, "trade prevented: own shop");
        return Err(AbortReason::SelfTrade);
    }
    if config.prevent_trading_while_owner_online && !is_owner && owner.online {
        tracing::debug!(actor = %actor.name, shop = %profile.name, "trade prevented: owner online");
        return Err(AbortReason::OwnerOnline);
    }
    Ok(())
}

/// Serializable description of a shop and its offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "offers")]
pub enum ShopDefinition {
    /// See [`AdminShop`].
    Admin(Vec<TradeOffer>),
    /// See [`SellingShop`].
    Selling(Vec<PriceOffer>),
    /// See [`BuyingShop`].
    Buying(Vec<PriceOffer>),
    /// See [`TradingShop`].
    Trading(Vec<TradeOffer>),
    /// See [`BookShop`].
    Book(Vec<BookOffer>),
}

impl ShopDefinition {
    /// Build the strategy for this definition.
    pub fn into_strategy(self) -> Box<dyn ShopStrategy> {
        match self {
            Self::Admin(offers) => Box::new(AdminShop::new(offers)),
            Self::Selling(offers) => Box::new(SellingShop::new(offers)),
            Self::Buying(offers) => Box::new(BuyingShop::new(offers)),
            Self::Trading(offers) => Box::new(TradingShop::new(offers)),
            Self::Book(offers) => Box::new(BookShop::new(offers)),
        }
    }
}
