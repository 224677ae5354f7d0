//! Shop offers: the persistent, priced mappings recipes are projected from.

use merchant_types::{ItemStack, TradingRecipe};
use serde::{Deserialize, Serialize};

/// An item sold or bought for a price in low currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceOffer {
    /// The traded item, with its per-trade amount.
    pub item: ItemStack,
    /// Price in low currency units.
    pub price: u32,
}

/// Copies of a written book sold for a price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookOffer {
    /// Title of the book being copied.
    pub title: String,
    /// Price in low currency units.
    pub price: u32,
}

/// An item traded for one or two other items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOffer {
    /// The item the actor receives.
    pub result: ItemStack,
    /// First required item.
    pub item1: ItemStack,
    /// Second required item.
    #[serde(default)]
    pub item2: Option<ItemStack>,
}

impl TradeOffer {
    /// The recipe this offer projects to, or `None` if the offer is invalid.
    pub fn to_recipe(&self) -> Option<TradingRecipe> {
        TradingRecipe::new(self.item1.clone(), self.item2.clone(), self.result.clone()).ok()
    }
}

/// Find the price offer whose item is similar to `item`.
pub fn find_price_offer<'a>(offers: &'a [PriceOffer], item: &ItemStack) -> Option<&'a PriceOffer> {
    offers.iter().find(|offer| offer.item.is_similar(item))
}

/// Find the book offer for `title`.
pub fn find_book_offer<'a>(offers: &'a [BookOffer], title: &str) -> Option<&'a BookOffer> {
    offers.iter().find(|offer| offer.title == title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trade_offer_projects_to_recipe() {
        let offer = TradeOffer {
            result: ItemStack::new("diamond", 1),
            item1: ItemStack::new("gold_ingot", 4),
            item2: Some(ItemStack::new("coal", 0)),
        };
        let recipe = offer.to_recipe();
        assert_eq!(recipe.as_ref().map(|r| r.item2.clone()), Some(None));
        assert_eq!(recipe.map(|r| r.item1.amount), Some(4));
    }

    #[test]
    fn invalid_trade_offer_has_no_recipe() {
        let offer = TradeOffer {
            result: ItemStack::new("diamond", 1),
            item1: ItemStack::new("gold_ingot", 0),
            item2: None,
        };
        assert_eq!(offer.to_recipe(), None);
    }

    #[test]
    fn offers_are_found_by_similarity_and_title() {
        let offers = vec![PriceOffer {
            item: ItemStack::new("bread", 3),
            price: 2,
        }];
        assert!(find_price_offer(&offers, &ItemStack::new("bread", 64)).is_some());
        assert!(find_price_offer(&offers, &ItemStack::new("cake", 1)).is_none());

        let books = vec![BookOffer {
            title: String::from("Atlas"),
            price: 12,
        }];
        assert_eq!(find_book_offer(&books, "Atlas").map(|o| o.price), Some(12));
        assert!(find_book_offer(&books, "Almanac").is_none());
    }
}
