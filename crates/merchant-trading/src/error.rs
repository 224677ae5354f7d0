//! Error types for the merchant-trading crate.
//!
//! Shop strategies never surface these to the trading actor: a failed
//! container access is translated into an
//! [`AbortReason`](merchant_types::AbortReason) by the caller.

/// Errors raised by slot-array inventory operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    /// A quantity computation overflowed.
    #[error("arithmetic overflow in inventory computation: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}

/// Errors raised by an external item container.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The container no longer exists or cannot be reached.
    #[error("container unreachable: {reason}")]
    Unreachable {
        /// Description of why the container could not be reached.
        reason: String,
    },

    /// The container refused to accept new contents.
    #[error("container rejected write: {reason}")]
    WriteRejected {
        /// Description of why the write was rejected.
        reason: String,
    },

    /// An inventory computation on the container contents failed.
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}
