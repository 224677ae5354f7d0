//! Trading shops: container items for other items.

use merchant_types::{AbortReason, ItemStack, ShopType, TradingRecipe};

use super::{ShopStrategy, TradeRequest};
use crate::config::{CurrencyConfig, TradingConfig};
use crate::inventory::{add_items, contains_at_least, remove_items};
use crate::offers::TradeOffer;

/// A player shop trading container items for the actor's items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradingShop {
    offers: Vec<TradeOffer>,
}

impl TradingShop {
    /// Create a trading shop with the given offers.
    pub const fn new(offers: Vec<TradeOffer>) -> Self {
        Self { offers }
    }

    fn find_offer(&self, recipe: &TradingRecipe) -> Option<&TradeOffer> {
        self.offers.iter().find(|offer| {
            let item2_same = match (&offer.item2, &recipe.item2) {
                (None, None) => true,
                (Some(a), Some(b)) => a.is_similar(b) && a.amount == b.amount,
                _ => false,
            };
            offer.result.is_similar(&recipe.result)
                && offer.item1.is_similar(&recipe.item1)
                && offer.item1.amount == recipe.item1.amount
                && item2_same
        })
    }
}

impl ShopStrategy for TradingShop {
    fn shop_type(&self) -> ShopType {
        ShopType::Trading
    }

    fn trading_recipes(
        &self,
        _currency: &CurrencyConfig,
        stock: Option<&[Option<ItemStack>]>,
    ) -> Vec<TradingRecipe> {
        self.offers
            .iter()
            .filter_map(|offer| {
                let recipe = offer.to_recipe()?;
                let in_stock = stock.is_some_and(|contents| {
                    contains_at_least(contents, |s| s.is_similar(&offer.result), offer.result.amount)
                });
                Some(recipe.with_out_of_stock(!in_stock))
            })
            .collect()
    }

    fn stage_effects(
        &self,
        request: &TradeRequest<'_>,
        working: &mut Vec<Option<ItemStack>>,
        _config: &TradingConfig,
    ) -> Result<(), AbortReason> {
        if self.find_offer(request.recipe).is_none() {
            tracing::debug!(actor = %request.actor.name, "trade prevented: no offer for the recipe");
            return Err(AbortReason::UnexpectedTrade);
        }

        let result = &request.recipe.result;
        if remove_items(working, |s| s.is_similar(result), result.amount) != 0 {
            tracing::debug!(actor = %request.actor.name, "trade prevented: container lacks the traded item");
            return Err(AbortReason::InsufficientStock);
        }

        let (first, second) = request.received();
        for received in std::iter::once(first).chain(second) {
            if add_items(working, &received) != 0 {
                tracing::debug!(actor = %request.actor.name, "trade prevented: container cannot hold the received items");
                return Err(AbortReason::InsufficientStorageSpace);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use merchant_types::Actor;

    use super::super::test_support::amount_of;
    use super::*;

    fn sword_for_gold_and_coal() -> TradingShop {
        TradingShop::new(vec![TradeOffer {
            result: ItemStack::new("iron_sword", 1).with_max_stack_size(1),
            item1: ItemStack::new("gold_ingot", 4),
            item2: Some(ItemStack::new("coal", 2)),
        }])
    }

    fn stage(shop: &TradingShop, working: &mut Vec<Option<ItemStack>>) -> Result<(), AbortReason> {
        let recipe = sword_for_gold_and_coal()
            .trading_recipes(&CurrencyConfig::default(), None)
            .into_iter()
            .next()
            .unwrap();
        let actor = Actor::new("tia");
        let gold = ItemStack::new("gold_ingot", 9);
        let coal = ItemStack::new("coal", 2);
        let request = TradeRequest {
            actor: &actor,
            recipe: &recipe,
            offered1: &gold,
            offered2: Some(&coal),
        };
        shop.stage_effects(&request, working, &TradingConfig::default())
    }

    #[test]
    fn staging_exchanges_items() {
        let mut working = vec![Some(ItemStack::new("iron_sword", 1).with_max_stack_size(1)), None];
        assert_eq!(stage(&sword_for_gold_and_coal(), &mut working), Ok(()));
        assert_eq!(amount_of(&working, "iron_sword"), 0);
        assert_eq!(amount_of(&working, "gold_ingot"), 4);
        assert_eq!(amount_of(&working, "coal"), 2);
    }

    #[test]
    fn second_received_item_needs_room_too() {
        let mut working = vec![
            Some(ItemStack::new("iron_sword", 1).with_max_stack_size(1)),
            Some(ItemStack::new("dirt", 64)),
        ];
        assert_eq!(
            stage(&sword_for_gold_and_coal(), &mut working),
            Err(AbortReason::InsufficientStorageSpace)
        );
    }

    #[test]
    fn missing_result_is_insufficient_stock() {
        let mut working = vec![None, None, None];
        assert_eq!(
            stage(&sword_for_gold_and_coal(), &mut working),
            Err(AbortReason::InsufficientStock)
        );
    }

    #[test]
    fn changed_offer_is_unexpected() {
        let mut working = vec![Some(ItemStack::new("iron_sword", 1).with_max_stack_size(1)), None];
        let repriced = TradingShop::new(vec![TradeOffer {
            result: ItemStack::new("iron_sword", 1).with_max_stack_size(1),
            item1: ItemStack::new("gold_ingot", 6),
            item2: Some(ItemStack::new("coal", 2)),
        }]);
        assert_eq!(
            stage(&repriced, &mut working),
            Err(AbortReason::UnexpectedTrade)
        );
    }
}
