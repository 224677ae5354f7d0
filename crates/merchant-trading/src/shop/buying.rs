//! Buying shops: the actor sells items, the container pays currency.

use merchant_types::{AbortReason, ItemStack, ShopType, TradingRecipe};

use super::{ShopStrategy, TradeRequest};
use crate::config::{CurrencyConfig, TradingConfig};
use crate::currency::remove_currency;
use crate::inventory::add_items;
use crate::offers::{PriceOffer, find_price_offer};

/// A player shop buying items with currency from its container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuyingShop {
    offers: Vec<PriceOffer>,
}

impl BuyingShop {
    /// Create a buying shop with the given offers.
    pub const fn new(offers: Vec<PriceOffer>) -> Self {
        Self { offers }
    }
}

impl ShopStrategy for BuyingShop {
    fn shop_type(&self) -> ShopType {
        ShopType::Buying
    }

    fn trading_recipes(
        &self,
        currency: &CurrencyConfig,
        stock: Option<&[Option<ItemStack>]>,
    ) -> Vec<TradingRecipe> {
        self.offers
            .iter()
            .filter_map(|offer| {
                // The payout is a single low currency stack.
                if offer.price > currency.item.max_stack_size {
                    tracing::warn!(price = offer.price, "buying price does not fit into one stack");
                    return None;
                }
                let recipe =
                    TradingRecipe::new(offer.item.clone(), None, currency.low_stack(offer.price))
                        .ok()?;
                let can_pay = stock.is_some_and(|contents| currency.total_value(contents) >= offer.price);
                Some(recipe.with_out_of_stock(!can_pay))
            })
            .collect()
    }

    fn stage_effects(
        &self,
        request: &TradeRequest<'_>,
        working: &mut Vec<Option<ItemStack>>,
        config: &TradingConfig,
    ) -> Result<(), AbortReason> {
        let Some(offer) = find_price_offer(&self.offers, &request.recipe.item1) else {
            tracing::debug!(actor = %request.actor.name, "trade prevented: no offer for the bought item");
            return Err(AbortReason::UnexpectedTrade);
        };

        if !remove_currency(working, &config.currency, offer.price) {
            tracing::debug!(actor = %request.actor.name, price = offer.price, "trade prevented: container cannot pay");
            return Err(AbortReason::InsufficientStock);
        }

        let (bought, _) = request.received();
        if add_items(working, &bought) != 0 {
            tracing::debug!(actor = %request.actor.name, "trade prevented: container cannot hold the bought items");
            return Err(AbortReason::InsufficientStorageSpace);
        }
        Ok(())
    }
}
