//! Selling shops: the container supplies the result, the shop earns
//! currency net of tax.

use merchant_types::{AbortReason, ItemStack, ShopType, TradingRecipe};

use super::{ShopStrategy, TradeRequest};
use crate::config::{CurrencyConfig, TradingConfig};
use crate::currency::add_currency;
use crate::inventory::{contains_at_least, remove_items};
use crate::offers::{PriceOffer, find_price_offer};

/// A player shop selling container items for currency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SellingShop {
    offers: Vec<PriceOffer>,
}

impl SellingShop {
    /// Create a selling shop with the given offers.
    pub const fn new(offers: Vec<PriceOffer>) -> Self {
        Self { offers }
    }
}

impl ShopStrategy for SellingShop {
    fn shop_type(&self) -> ShopType {
        ShopType::Selling
    }

    fn trading_recipes(
        &self,
        currency: &CurrencyConfig,
        stock: Option<&[Option<ItemStack>]>,
    ) -> Vec<TradingRecipe> {
        self.offers
            .iter()
            .filter_map(|offer| {
                let (item1, item2) = currency.price_to_cost(offer.price)?;
                let recipe = TradingRecipe::new(item1, item2, offer.item.clone()).ok()?;
                let in_stock = stock.is_some_and(|contents| {
                    contains_at_least(contents, |s| s.is_similar(&offer.item), offer.item.amount)
                });
                Some(recipe.with_out_of_stock(!in_stock))
            })
            .collect()
    }

    fn stage_effects(
        &self,
        request: &TradeRequest<'_>,
        working: &mut Vec<Option<ItemStack>>,
        config: &TradingConfig,
    ) -> Result<(), AbortReason> {
        let result = &request.recipe.result;
        let Some(offer) = find_price_offer(&self.offers, result) else {
            tracing::debug!(actor = %request.actor.name, "trade prevented: no offer for the traded item");
            return Err(AbortReason::UnexpectedTrade);
        };

        if remove_items(working, |s| s.is_similar(result), result.amount) != 0 {
            tracing::debug!(actor = %request.actor.name, "trade prevented: container lacks the traded item");
            return Err(AbortReason::InsufficientStock);
        }

        let earnings = config.tax.net_amount(offer.price);
        if earnings > 0 && add_currency(working, &config.currency, earnings) != 0 {
            tracing::debug!(actor = %request.actor.name, earnings, "trade prevented: container cannot hold the earnings");
            return Err(AbortReason::InsufficientStorageSpace);
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
    use crate::config::TaxPolicy;

    fn bread_shop() -> SellingShop {
        SellingShop::new(vec![PriceOffer {
            item: ItemStack::new("bread", 4),
            price: 10,
        }])
    }

    fn first_recipe(shop: &SellingShop, stock: Option<&[Option<ItemStack>]>) -> TradingRecipe {
        shop.trading_recipes(&CurrencyConfig::default(), stock)
            .into_iter()
            .next()
            .unwrap()
    }

    fn stage(
        shop: &SellingShop,
        recipe: &TradingRecipe,
        working: &mut Vec<Option<ItemStack>>,
        config: &TradingConfig,
    ) -> Result<(), AbortReason> {
        let actor = Actor::new("bea");
        let offered = ItemStack::new("emerald", 10);
        let request = TradeRequest {
            actor: &actor,
            recipe,
            offered1: &offered,
            offered2: None,
        };
        shop.stage_effects(&request, working, config)
    }

    #[test]
    fn recipes_reflect_live_stock() {
        let shop = bread_shop();
        let stocked = vec![Some(ItemStack::new("bread", 4))];
        let empty: Vec<Option<ItemStack>> = vec![None];
        assert!(!first_recipe(&shop, Some(stocked.as_slice())).out_of_stock);
        assert!(first_recipe(&shop, Some(empty.as_slice())).out_of_stock);
        assert!(first_recipe(&shop, None).out_of_stock);
        assert_eq!(
            first_recipe(&shop, None).item1,
            ItemStack::new("emerald", 10)
        );
    }

    #[test]
    fn staging_moves_stock_and_taxed_earnings() {
        let shop = bread_shop();
        let recipe = first_recipe(&shop, None);
        let config = TradingConfig {
            tax: TaxPolicy {
                rate_percent: 10,
                round_up: false,
            },
            ..TradingConfig::default()
        };
        let mut working = vec![Some(ItemStack::new("bread", 6)), None];
        assert_eq!(stage(&shop, &recipe, &mut working, &config), Ok(()));
        assert_eq!(amount_of(&working, "bread"), 2);
        assert_eq!(amount_of(&working, "emerald"), 9);
    }

    #[test]
    fn sold_stock_frees_room_for_earnings() {
        let shop = bread_shop();
        let recipe = first_recipe(&shop, None);
        let mut working = vec![
            Some(ItemStack::new("bread", 4)),
            Some(ItemStack::new("dirt", 64)),
        ];
        assert_eq!(
            stage(&shop, &recipe, &mut working, &TradingConfig::default()),
            Ok(())
        );
        assert_eq!(amount_of(&working, "emerald"), 10);
    }

    #[test]
    fn full_container_reports_missing_space() {
        let shop = bread_shop();
        let recipe = first_recipe(&shop, None);
        let mut working = vec![
            Some(ItemStack::new("bread", 8)),
            Some(ItemStack::new("dirt", 64)),
        ];
        assert_eq!(
            stage(&shop, &recipe, &mut working, &TradingConfig::default()),
            Err(AbortReason::InsufficientStorageSpace)
        );
    }

    #[test]
    fn missing_stock_is_reported() {
        let shop = bread_shop();
        let recipe = first_recipe(&shop, None);
        let mut working = vec![Some(ItemStack::new("bread", 3)), None];
        assert_eq!(
            stage(&shop, &recipe, &mut working, &TradingConfig::default()),
            Err(AbortReason::InsufficientStock)
        );
    }

    #[test]
    fn vanished_offer_is_unexpected() {
        let recipe = first_recipe(&bread_shop(), None);
        let mut working = vec![Some(ItemStack::new("bread", 4))];
        assert_eq!(
            stage(
                &SellingShop::default(),
                &recipe,
                &mut working,
                &TradingConfig::default()
            ),
            Err(AbortReason::UnexpectedTrade)
        );
    }
}
