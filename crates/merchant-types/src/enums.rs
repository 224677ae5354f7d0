//! Enumeration types shared by every merchant crate.
//!
//! Covers item comparison policies, slot ordering, input gesture kinds, the
//! phases of a single trade attempt, and the machine-readable abort reasons
//! that cross the engine boundary.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Item comparison
// ---------------------------------------------------------------------------

/// Policy used to decide whether an offered stack satisfies a required one.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum ItemComparison {
    /// Type and every piece of metadata must be equal.
    Strict,
    /// Type must be equal and the offered stack must carry every core
    /// metadata component the required stack declares. Extra offered
    /// metadata is ignored.
    #[default]
    Lenient,
}

/// How the two offered stacks line up with a recipe's two required stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum SlotOrder {
    /// Slot 1 satisfies `item1`, slot 2 satisfies `item2`.
    AsIs,
    /// Slot 1 satisfies `item2`, slot 2 satisfies `item1`.
    Swapped,
}

impl SlotOrder {
    /// Whether the offered stacks are in reverse order relative to the recipe.
    pub const fn is_swapped(self) -> bool {
        matches!(self, Self::Swapped)
    }
}

// ---------------------------------------------------------------------------
// Gestures
// ---------------------------------------------------------------------------

/// The kind of a normalized input gesture on the trading window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum GestureKind {
    /// Pick up the whole clicked stack onto the cursor.
    PickupAll,
    /// Pick up half of the clicked stack onto the cursor.
    PickupHalf,
    /// Swap the clicked slot with a hotbar slot (number key).
    HotbarSwap,
    /// Move the clicked stack into the other inventory (shift-click).
    MoveToOtherInventory,
    /// Gather all stacks similar to the cursor onto the cursor (double click).
    CollectToCursor,
    /// Creative-mode middle click copy.
    CloneStack,
    /// Drop one item of the clicked slot.
    DropOneSlot,
    /// Drop the whole clicked slot.
    DropAllSlot,
    /// Place the whole cursor stack into the clicked slot.
    PlaceAll,
    /// Any other interaction.
    Other,
}

impl GestureKind {
    /// Whether this gesture requests "trade as many times as possible".
    pub const fn is_bulk(self) -> bool {
        matches!(self, Self::MoveToOtherInventory)
    }
}

// ---------------------------------------------------------------------------
// Trade phases
// ---------------------------------------------------------------------------

/// Phase of a single trade attempt.
///
/// ```text
/// Idle -> Matched -> Prepared -> Notified -> Applied
///            \          \           \
///             +----------+-----------+--> Aborted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum TradePhase {
    /// No trade has been identified yet.
    Idle,
    /// A recipe and offered-item binding were found.
    Matched,
    /// Shop preconditions passed and effects are staged.
    Prepared,
    /// The veto hook allowed the trade; it can no longer be cancelled.
    Notified,
    /// The trade was committed (terminal).
    Applied,
    /// The trade was abandoned (terminal).
    Aborted,
}

impl TradePhase {
    /// Whether moving from `self` to `next` is a legal transition.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Matched)
                | (Self::Matched, Self::Prepared)
                | (Self::Prepared, Self::Notified)
                | (Self::Notified, Self::Applied)
                | (Self::Matched | Self::Prepared | Self::Notified, Self::Aborted)
        )
    }

    /// Whether the phase is terminal.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Applied | Self::Aborted)
    }
}

// ---------------------------------------------------------------------------
// Abort reasons
// ---------------------------------------------------------------------------

/// Coarse error taxonomy of the exchange pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum FailureKind {
    /// A shop precondition failed; shown to the actor.
    PreconditionFailed,
    /// The veto hook denied the trade.
    Vetoed,
    /// Engine state disagreed with the displayed window state. A defect.
    InternalInconsistency,
    /// A storage rejected a write during commit.
    StorageWriteFailed,
}

/// Machine-readable reason a trade attempt was aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum AbortReason {
    /// The actor owns the shop and trading with the own shop is disabled.
    SelfTrade,
    /// The owner is online and trading while the owner is online is disabled.
    OwnerOnline,
    /// The shop's backing container is missing or unreachable.
    MissingContainer,
    /// The recipe does not correspond to any current offer of the shop.
    UnexpectedTrade,
    /// The container lacks the items the trade removes from it.
    InsufficientStock,
    /// A book shop's container has no blank writable book left.
    InsufficientWritableBooks,
    /// The container cannot hold what the trade adds to it.
    InsufficientStorageSpace,
    /// The veto hook denied the trade.
    Vetoed,
    /// The matched recipe no longer equals the displayed result.
    InternalInconsistency,
    /// A storage rejected a write during commit.
    StorageWriteFailed,
}

impl AbortReason {
    /// Which error kind this reason belongs to.
    pub const fn kind(self) -> FailureKind {
        match self {
            Self::SelfTrade
            | Self::OwnerOnline
            | Self::MissingContainer
            | Self::UnexpectedTrade
            | Self::InsufficientStock
            | Self::InsufficientWritableBooks
            | Self::InsufficientStorageSpace => FailureKind::PreconditionFailed,
            Self::Vetoed => FailureKind::Vetoed,
            Self::InternalInconsistency => FailureKind::InternalInconsistency,
            Self::StorageWriteFailed => FailureKind::StorageWriteFailed,
        }
    }

    /// Stable kebab-case tag for messaging and metrics.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::SelfTrade => "self-trade",
            Self::OwnerOnline => "owner-online",
            Self::MissingContainer => "missing-container",
            Self::UnexpectedTrade => "unexpected-trade",
            Self::InsufficientStock => "insufficient-stock",
            Self::InsufficientWritableBooks => "insufficient-writable-books",
            Self::InsufficientStorageSpace => "insufficient-storage-space",
            Self::Vetoed => "vetoed",
            Self::InternalInconsistency => "internal-inconsistency",
            Self::StorageWriteFailed => "storage-write-failed",
        }
    }

    /// Default English message shown to the trading actor.
    pub const fn message(self) -> &'static str {
        match self {
            Self::SelfTrade => "You cannot trade with your own shop.",
            Self::OwnerOnline => "You cannot trade with this shop while its owner is online.",
            Self::MissingContainer => "This shop's container is missing.",
            Self::UnexpectedTrade => "This trade is no longer available.",
            Self::InsufficientStock => "This shop is out of stock.",
            Self::InsufficientWritableBooks => "This shop has no blank books left to copy into.",
            Self::InsufficientStorageSpace => "This shop cannot hold any more items.",
            Self::Vetoed => "The trade was cancelled.",
            Self::InternalInconsistency | Self::StorageWriteFailed => {
                "The trade could not be completed."
            }
        }
    }
}

impl core::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Answer of the external veto hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Verdict {
    /// Let the trade proceed.
    Allow,
    /// Cancel the trade.
    Deny,
}

// ---------------------------------------------------------------------------
// Shop types
// ---------------------------------------------------------------------------

/// The kind of shop a shopkeeper runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ShopType {
    /// Server-owned shop with unlimited stock and no container.
    Admin,
    /// Player shop selling container items for currency.
    Selling,
    /// Player shop buying items for currency paid from the container.
    Buying,
    /// Player shop trading container items for other items.
    Trading,
    /// Player shop selling copies of written books.
    Book,
}

impl ShopType {
    /// Whether this shop type is backed by an external container.
    pub const fn uses_container(self) -> bool {
        !matches!(self, Self::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_transitions() {
        assert!(TradePhase::Idle.can_transition_to(TradePhase::Matched));
        assert!(TradePhase::Matched.can_transition_to(TradePhase::Prepared));
        assert!(TradePhase::Prepared.can_transition_to(TradePhase::Notified));
        assert!(TradePhase::Notified.can_transition_to(TradePhase::Applied));
        assert!(TradePhase::Matched.can_transition_to(TradePhase::Aborted));
        assert!(TradePhase::Notified.can_transition_to(TradePhase::Aborted));
    }

    #[test]
    fn illegal_transitions() {
        assert!(!TradePhase::Idle.can_transition_to(TradePhase::Aborted));
        assert!(!TradePhase::Idle.can_transition_to(TradePhase::Applied));
        assert!(!TradePhase::Matched.can_transition_to(TradePhase::Applied));
        assert!(!TradePhase::Applied.can_transition_to(TradePhase::Aborted));
        assert!(!TradePhase::Aborted.can_transition_to(TradePhase::Matched));
    }

    #[test]
    fn abort_reason_kinds() {
        assert_eq!(AbortReason::SelfTrade.kind(), FailureKind::PreconditionFailed);
        assert_eq!(
            AbortReason::InsufficientStorageSpace.kind(),
            FailureKind::PreconditionFailed
        );
        assert_eq!(AbortReason::Vetoed.kind(), FailureKind::Vetoed);
        assert_eq!(
            AbortReason::InternalInconsistency.kind(),
            FailureKind::InternalInconsistency
        );
        assert_eq!(AbortReason::StorageWriteFailed.to_string(), "storage-write-failed");
    }

    #[test]
    fn only_admin_shops_lack_containers() {
        assert!(!ShopType::Admin.uses_container());
        assert!(ShopType::Book.uses_container());
        assert!(ShopType::Selling.uses_container());
    }
}
