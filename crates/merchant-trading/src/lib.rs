//! Trading logic for the merchant exchange engine.
//!
//! This crate contains every pure piece of the exchange pipeline: deciding
//! whether offered stacks pay for a recipe, computing taxes, classifying
//! input gestures, manipulating slot-array inventories, and the shop
//! strategies that stage a trade's effects on a container. It performs no
//! I/O beyond the [`ItemContainer`] seam.
//!
//! # Modules
//!
//! - [`classifier`] -- Synthetic shift-click detection ([`InputClassifier`])
//! - [`config`] -- Runtime trading settings ([`TradingConfig`])
//! - [`container`] -- The external container seam ([`ItemContainer`])
//! - [`context`] -- Per-attempt trade context ([`TradeContext`])
//! - [`currency`] -- Price splitting and currency payouts
//! - [`error`] -- Error types ([`StorageError`], [`InventoryError`])
//! - [`inventory`] -- Slot-array add, remove and count operations
//! - [`matcher`] -- Recipe matching in either slot order
//! - [`offers`] -- Priced offers recipes are projected from
//! - [`shop`] -- Shop strategies ([`ShopStrategy`])
//! - [`tax`] -- Tax calculation

pub mod classifier;
pub mod config;
pub mod container;
pub mod context;
pub mod currency;
pub mod error;
pub mod inventory;
pub mod matcher;
pub mod offers;
pub mod shop;
pub mod tax;

// Re-export primary types at crate root for convenience.
pub use classifier::{Classification, DEFAULT_SYNTHETIC_WINDOW, InputClassifier};
pub use config::{CurrencyConfig, HighCurrency, TaxPolicy, TradingConfig};
pub use container::{ItemContainer, MemoryContainer};
pub use context::{StagedContainer, TradeContext};
pub use currency::{add_currency, remove_currency};
pub use error::{InventoryError, StorageError};
pub use matcher::{RecipeBinding, find_active_recipe, match_recipe};
pub use offers::{BookOffer, PriceOffer, TradeOffer};
pub use shop::{
    AdminShop, BookShop, BuyingShop, SellingShop, ShopDefinition, ShopProfile, ShopStrategy,
    TradeRequest, TradingShop, check_owner_rules,
};
pub use tax::net_amount;
