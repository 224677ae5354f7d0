//! Core structs: trading parties, input gestures, and the payloads of the
//! notifications the engine produces.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{AbortReason, GestureKind};
use crate::ids::{ActorId, ShopkeeperId, TradeId};
use crate::item::ItemStack;
use crate::recipe::TradingRecipe;

// ---------------------------------------------------------------------------
// Window slots
// ---------------------------------------------------------------------------

/// Raw slot id of the first offered-item slot.
pub const BUY_SLOT_1: i32 = 0;
/// Raw slot id of the second offered-item slot.
pub const BUY_SLOT_2: i32 = 1;
/// Raw slot id of the result slot.
pub const RESULT_SLOT: i32 = 2;

// ---------------------------------------------------------------------------
// Parties
// ---------------------------------------------------------------------------

/// The actor interacting with a shop.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Actor {
    /// Actor identifier.
    pub id: ActorId,
    /// Display name, used in logs.
    pub name: String,
    /// Whether the actor bypasses owner-related trading restrictions.
    #[serde(default)]
    pub can_bypass: bool,
}

impl Actor {
    /// Create an actor without bypass rights.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ActorId::new(),
            name: name.into(),
            can_bypass: false,
        }
    }
}

/// Owner of a player shop, with current presence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ShopOwner {
    /// Owner identifier.
    pub id: ActorId,
    /// Owner display name.
    pub name: String,
    /// Whether the owner is currently online.
    #[serde(default)]
    pub online: bool,
}

// ---------------------------------------------------------------------------
// Gestures
// ---------------------------------------------------------------------------

/// One normalized input event on the trading window.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Gesture {
    /// Raw slot id the gesture targets.
    pub slot: i32,
    /// What the actor did.
    pub kind: GestureKind,
    /// Arrival time in milliseconds on a monotonic clock.
    pub timestamp_ms: u64,
    /// Hotbar button (0..=8) for [`GestureKind::HotbarSwap`].
    #[serde(default)]
    pub hotbar_button: Option<u8>,
}

impl Gesture {
    /// A gesture without hotbar button.
    pub const fn new(slot: i32, kind: GestureKind, timestamp_ms: u64) -> Self {
        Self {
            slot,
            kind,
            timestamp_ms,
            hotbar_button: None,
        }
    }

    /// Whether the gesture targets the result slot.
    pub const fn targets_result(&self) -> bool {
        self.slot == RESULT_SLOT
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Immutable summary of a pending trade handed to the veto hook.
///
/// The offered stacks are truncated or expanded to the recipe's declared
/// quantities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PendingTradeSummary {
    /// The trade attempt.
    pub trade_id: TradeId,
    /// Shop being traded with.
    pub shopkeeper_id: ShopkeeperId,
    /// Trading actor.
    pub actor: Actor,
    /// Recipe being used.
    pub recipe: TradingRecipe,
    /// Offered stack matching `item1`, at the recipe quantity.
    pub offered1: ItemStack,
    /// Offered stack matching `item2`, at the recipe quantity.
    pub offered2: Option<ItemStack>,
    /// Whether the offered stacks sit in reverse slot order.
    pub swapped: bool,
}

/// Details of a committed trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TradeCommittedDetails {
    /// The trade attempt.
    pub trade_id: TradeId,
    /// Shop traded with.
    pub shopkeeper_id: ShopkeeperId,
    /// Trading actor.
    pub actor_id: ActorId,
    /// Recipe used.
    pub recipe: TradingRecipe,
    /// Items taken from the actor for `item1`.
    pub paid1: ItemStack,
    /// Items taken from the actor for `item2`.
    pub paid2: Option<ItemStack>,
    /// Whether the offered stacks sat in reverse slot order.
    pub swapped: bool,
    /// 1-based attempt number within the triggering gesture.
    pub trade_index: u32,
}

/// Details of an aborted trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TradeAbortedDetails {
    /// The trade attempt, absent if the abort happened before a trade
    /// context existed.
    pub trade_id: Option<TradeId>,
    /// Shop traded with.
    pub shopkeeper_id: ShopkeeperId,
    /// Trading actor.
    pub actor_id: ActorId,
    /// Why the trade was aborted.
    pub reason: AbortReason,
}

/// Notification produced by the exchange engine.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum TradeEvent {
    /// A trade was committed.
    Committed(TradeCommittedDetails),
    /// A trade was aborted.
    Aborted(TradeAbortedDetails),
    /// Recipes may have changed; displayed trades should be refreshed.
    RecipesChanged {
        /// Shop whose recipes may have changed.
        shopkeeper_id: ShopkeeperId,
        /// Actor whose window should refresh.
        actor_id: ActorId,
    },
}
