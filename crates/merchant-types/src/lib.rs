//! Shared type definitions for the merchant exchange engine.
//!
//! This crate is the single source of truth for the data model used across
//! the workspace. Types flow downstream to `TypeScript` via `ts-rs` so that
//! dashboards can consume trade notifications.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for actors, shops, sessions, trades
//! - [`enums`] -- Comparison modes, slot order, gestures, phases, abort reasons
//! - [`item`] -- [`ItemStack`] and its metadata, similarity and matching
//! - [`recipe`] -- [`TradingRecipe`], the matchable projection of an offer
//! - [`structs`] -- Parties, gestures, and notification payloads

pub mod enums;
pub mod ids;
pub mod item;
pub mod recipe;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    AbortReason, FailureKind, GestureKind, ItemComparison, ShopType, SlotOrder, TradePhase,
    Verdict,
};
pub use ids::{ActorId, LedgerEntryId, SessionId, ShopkeeperId, TradeId};
pub use item::{
    BookGeneration, BookMeta, DEFAULT_MAX_STACK_SIZE, ItemMeta, ItemStack, non_empty, stack_amount,
};
pub use recipe::{RecipeError, TradingRecipe};
pub use structs::{
    Actor, BUY_SLOT_1, BUY_SLOT_2, Gesture, PendingTradeSummary, RESULT_SLOT, ShopOwner,
    TradeAbortedDetails, TradeCommittedDetails, TradeEvent,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for every exported type.

    #[test]
    fn export_bindings() {
        // The files are written to the `bindings/` directory relative to the
        // crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::ActorId::export_all();
        let _ = crate::ids::ShopkeeperId::export_all();
        let _ = crate::ids::SessionId::export_all();
        let _ = crate::ids::TradeId::export_all();
        let _ = crate::ids::LedgerEntryId::export_all();

        // Enums
        let _ = crate::enums::ItemComparison::export_all();
        let _ = crate::enums::SlotOrder::export_all();
        let _ = crate::enums::GestureKind::export_all();
        let _ = crate::enums::TradePhase::export_all();
        let _ = crate::enums::FailureKind::export_all();
        let _ = crate::enums::AbortReason::export_all();
        let _ = crate::enums::Verdict::export_all();
        let _ = crate::enums::ShopType::export_all();

        // Items and recipes
        let _ = crate::item::BookGeneration::export_all();
        let _ = crate::item::BookMeta::export_all();
        let _ = crate::item::ItemMeta::export_all();
        let _ = crate::item::ItemStack::export_all();
        let _ = crate::recipe::TradingRecipe::export_all();

        // Structs
        let _ = crate::structs::Actor::export_all();
        let _ = crate::structs::ShopOwner::export_all();
        let _ = crate::structs::Gesture::export_all();
        let _ = crate::structs::PendingTradeSummary::export_all();
        let _ = crate::structs::TradeCommittedDetails::export_all();
        let _ = crate::structs::TradeAbortedDetails::export_all();
        let _ = crate::structs::TradeEvent::export_all();
    }
}
