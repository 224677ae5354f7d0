//! Core of the merchant exchange engine.
//!
//! Drives trades between an actor and a shopkeeper through the trading
//! window: gesture dispatch, the per-attempt state machine, the batch
//! driver, and the configuration that feeds them. All pure trading logic
//! lives in `merchant-trading`; this crate sequences it against the
//! collaborators the host provides.
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration ([`MerchantConfig`])
//! - [`window`] -- Collaborator traits ([`TradingWindow`], [`ActorInventory`], ...)
//! - [`memory`] -- In-memory collaborators
//! - [`shopkeeper`] -- [`Shopkeeper`], a profile plus its shop strategy
//! - [`preparer`] -- Precondition checks and staging ([`prepare`])
//! - [`session`] -- [`TradeSession`] and the trade state machine
//! - [`batch`] -- Repeated trading for shift-clicks ([`run_batch`])
//! - [`engine`] -- Gesture dispatch ([`ExchangeEngine`])

pub mod batch;
pub mod config;
pub mod engine;
pub mod memory;
pub mod preparer;
pub mod session;
pub mod shopkeeper;
pub mod window;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support;

// Re-export primary types at crate root for convenience.
pub use batch::{BatchOutcome, BatchStop, run_batch};
pub use config::{ConfigError, MerchantConfig};
pub use engine::{ExchangeEngine, GestureOutcome, IgnoreReason};
pub use memory::{MemoryInventory, MemoryWindow};
pub use preparer::{PrepareRequest, prepare};
pub use session::{AttemptOutcome, IdleReason, Payout, TradeSession};
pub use shopkeeper::Shopkeeper;
pub use window::{
    ActorInventory, AllowAll, Collaborators, EventSink, RecipeSource, ShopRecipes, TradingWindow,
    VetoHook,
};
