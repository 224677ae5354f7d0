//! The batch trade driver behind shift-clicks on the result slot.
//!
//! Trades repeatedly until one of these stops the loop: the actor's storage
//! cannot hold another result, an attempt does not commit, the offered
//! items no longer match, or the displayed result changes kind. Each commit
//! consumes at least one offered item, so the loop ends.

use merchant_trading::TradingConfig;
use merchant_trading::inventory::add_items_client_order;
use merchant_types::{AbortReason, ItemStack};

use crate::session::{AttemptOutcome, IdleReason, Payout, TradeSession};
use crate::shopkeeper::Shopkeeper;
use crate::window::Collaborators;

/// Why a batch stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStop {
    /// The result slot is empty.
    EmptyResult,
    /// The actor's storage cannot hold another result.
    InsufficientSpace,
    /// The result changed to a different item.
    ResultChanged,
    /// An attempt identified no trade.
    Idle(IdleReason),
    /// An attempt was aborted.
    Aborted(AbortReason),
}

/// Result of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Number of committed trades.
    pub commits: u32,
    /// Why the batch stopped.
    pub stop: BatchStop,
}

/// Trade as many times as possible, paying results into storage.
pub fn run_batch(
    session: &mut TradeSession,
    shop: &mut Shopkeeper,
    env: &mut Collaborators<'_>,
    config: &TradingConfig,
) -> BatchOutcome {
    let mut commits: u32 = 0;
    let mut previous: Option<ItemStack> = None;

    let stop = loop {
        let Some(result) = env.window.result_stack() else {
            break BatchStop::EmptyResult;
        };
        if previous.as_ref().is_some_and(|p| !p.is_similar(&result)) {
            break BatchStop::ResultChanged;
        }

        let mut storage = env.inventory.storage();
        if add_items_client_order(&mut storage, &result) != 0 {
            tracing::debug!(actor = %session.actor().name, "not enough storage space for another trade");
            break BatchStop::InsufficientSpace;
        }

        match session.attempt(shop, env, config, Payout::Storage(storage)) {
            AttemptOutcome::Committed(_) => {
                commits = commits.saturating_add(1);
                previous = Some(result);
            }
            AttemptOutcome::Idle(reason) => break BatchStop::Idle(reason),
            AttemptOutcome::Aborted(reason) => break BatchStop::Aborted(reason),
        }
    };

    tracing::debug!(actor = %session.actor().name, commits, ?stop, "batch finished");
    BatchOutcome { commits, stop }
}
