//! A shopkeeper: identity, ownership and the strategy of its shop type.

use merchant_trading::{ShopDefinition, ShopProfile, ShopStrategy};
use merchant_types::{ShopType, ShopkeeperId};

/// A shop the engine trades with.
pub struct Shopkeeper {
    /// Identity and ownership.
    pub profile: ShopProfile,
    strategy: Box<dyn ShopStrategy>,
}

impl Shopkeeper {
    /// Create a shopkeeper running `strategy`.
    pub fn new(profile: ShopProfile, strategy: Box<dyn ShopStrategy>) -> Self {
        Self { profile, strategy }
    }

    /// Create a shopkeeper from a serialized shop definition.
    pub fn from_definition(profile: ShopProfile, definition: ShopDefinition) -> Self {
        Self::new(profile, definition.into_strategy())
    }

    /// Shopkeeper identifier.
    pub const fn id(&self) -> ShopkeeperId {
        self.profile.id
    }

    /// The kind of shop.
    pub fn shop_type(&self) -> ShopType {
        self.strategy.shop_type()
    }

    /// The shop's trading behavior.
    pub fn strategy(&self) -> &dyn ShopStrategy {
        self.strategy.as_ref()
    }

    /// The shop's trading behavior, for the post-trade hooks.
    pub fn strategy_mut(&mut self) -> &mut dyn ShopStrategy {
        self.strategy.as_mut()
    }
}

impl core::fmt::Debug for Shopkeeper {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Shopkeeper")
            .field("profile", &self.profile)
            .field("shop_type", &self.shop_type())
            .finish_non_exhaustive()
    }
}
