//! Admin shops: unlimited stock, no container, no owner rules.

use merchant_types::{AbortReason, Actor, ItemStack, ShopType, TradingRecipe};

use super::{ShopProfile, ShopStrategy, TradeRequest};
use crate::config::{CurrencyConfig, TradingConfig};
use crate::offers::TradeOffer;

/// A server-owned shop trading fixed offers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminShop {
    offers: Vec<TradeOffer>,
}

impl AdminShop {
    /// Create an admin shop with the given offers.
    pub const fn new(offers: Vec<TradeOffer>) -> Self {
        Self { offers }
    }
}

impl ShopStrategy for AdminShop {
    fn shop_type(&self) -> ShopType {
        ShopType::Admin
    }

    fn trading_recipes(
        &self,
        _currency: &CurrencyConfig,
        _stock: Option<&[Option<ItemStack>]>,
    ) -> Vec<TradingRecipe> {
        self.offers.iter().filter_map(TradeOffer::to_recipe).collect()
    }

    fn check_preconditions(
        &self,
        _profile: &ShopProfile,
        _actor: &Actor,
        _config: &TradingConfig,
    ) -> Result<(), AbortReason> {
        Ok(())
    }

    fn stage_effects(
        &self,
        _request: &TradeRequest<'_>,
        _working: &mut Vec<Option<ItemStack>>,
        _config: &TradingConfig,
    ) -> Result<(), AbortReason> {
        Ok(())
    }
}
