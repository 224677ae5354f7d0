//! Append-only record of committed merchant trades.
//!
//! Every committed trade is booked as double entries: one payment entry per
//! stack the actor handed over (actor to shop) and one delivery entry for
//! the result (shop to actor). Aborted attempts are not booked; they are
//! tallied by reason for statistics.
//!
//! # Architecture
//!
//! - [`entry`] -- [`LedgerEntry`] and the validating [`EntryBuilder`].
//! - [`ledger`] -- The [`TradeLedger`]: append-only log, tallies, summary.
//! - [`balance`] -- Per-trade verification of the double-entry shape.
//!
//! # Entry kinds
//!
//! | Kind | From | To |
//! |------|------|----|
//! | Payment | Actor | Shop |
//! | Delivery | Shop | Actor |
//!
//! The ledger never panics; it returns errors.

pub mod balance;
pub mod entry;
pub mod ledger;

// Re-export primary types at crate root.
pub use balance::{TradeBalance, verify_trade};
pub use entry::{EntryBuilder, EntryKind, LedgerEntry, Party};
pub use ledger::{LedgerSummary, TradeLedger};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when recording ledger entries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Entries must move at least one item.
    #[error("ledger entry amount must be non-zero")]
    ZeroAmount,

    /// A required field was not set on the builder.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The parties do not match the expected parties for the entry kind.
    #[error("invalid party for {kind:?} {side}: expected {expected}, got {actual}")]
    InvalidParty {
        /// The entry kind being validated.
        kind: EntryKind,
        /// Which side of the entry ("from" or "to").
        side: &'static str,
        /// The expected party kind.
        expected: &'static str,
        /// The actual party kind.
        actual: &'static str,
    },

    /// The trade was already booked.
    #[error("trade {0} is already recorded")]
    DuplicateTrade(merchant_types::TradeId),
}
