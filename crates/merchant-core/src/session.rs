//! The per-window trade session and the state machine of one attempt.
//!
//! ```text
//! Idle -> Matched -> Prepared -> Notified -> Applied
//!            \          \           \
//!             +----------+-----------+--> Aborted
//! ```
//!
//! A context exists from `Matched` on and is consumed by exactly one of
//! the shop's two hooks, including when a precondition fails. Before
//! `Notified` nothing has been written. After `Notified` the only abort is
//! a storage write failure, which rolls the container back.

use merchant_trading::{
    Classification, InputClassifier, ItemContainer, RecipeBinding, ShopStrategy as _,
    StorageError, TradeContext, TradingConfig, find_active_recipe, match_recipe,
};
use merchant_types::{
    AbortReason, Actor, BUY_SLOT_1, BUY_SLOT_2, Gesture, ItemStack, SessionId,
    TradeAbortedDetails, TradeCommittedDetails, TradeEvent, TradeId, TradePhase, Verdict,
};

use crate::preparer::{PrepareRequest, prepare};
use crate::shopkeeper::Shopkeeper;
use crate::window::{ActorInventory, Collaborators};

/// Where the result of a trade goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payout {
    /// Replace the cursor with this stack.
    Cursor(ItemStack),
    /// Put the stack into an empty storage slot.
    Slot {
        /// Storage slot index.
        index: usize,
        /// The result stack.
        stack: ItemStack,
    },
    /// Replace the whole storage with these staged contents.
    Storage(Vec<Option<ItemStack>>),
}

impl Payout {
    fn write(self, inventory: &mut dyn ActorInventory) -> Result<(), StorageError> {
        match self {
            Self::Cursor(stack) => inventory.set_cursor(Some(stack)),
            Self::Slot { index, stack } => {
                let mut storage = inventory.storage();
                let Some(slot) = storage.get_mut(index) else {
                    return Err(StorageError::WriteRejected {
                        reason: format!("no storage slot {index}"),
                    });
                };
                *slot = Some(stack);
                inventory.set_storage(storage)
            }
            Self::Storage(contents) => inventory.set_storage(contents),
        }
    }
}

/// Why an attempt ended without identifying a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleReason {
    /// The result slot is empty.
    EmptyResult,
    /// No displayed recipe matches the offered stacks.
    NoActiveRecipe,
    /// The active recipe does not match under the configured comparison.
    NoMatch,
}

/// How one attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// No trade was identified.
    Idle(IdleReason),
    /// The trade was committed.
    Committed(Box<TradeCommittedDetails>),
    /// The trade was aborted.
    Aborted(AbortReason),
}

/// Tracks the phase of one attempt and reports illegal transitions.
#[derive(Debug)]
struct PhaseTracker {
    trade_id: TradeId,
    phase: TradePhase,
}

impl PhaseTracker {
    const fn matched(trade_id: TradeId) -> Self {
        Self {
            trade_id,
            phase: TradePhase::Matched,
        }
    }

    fn advance(&mut self, next: TradePhase) {
        if !self.phase.can_transition_to(next) {
            tracing::error!(
                trade_id = %self.trade_id,
                from = ?self.phase,
                to = ?next,
                "illegal trade phase transition"
            );
        }
        self.phase = next;
    }
}

/// Reborrow an optional container for a single call.
fn reborrow<'s>(
    container: &'s mut Option<&mut dyn ItemContainer>,
) -> Option<&'s mut dyn ItemContainer> {
    match container {
        Some(container) => Some(&mut **container),
        None => None,
    }
}

/// One actor's trading session with an open window.
#[derive(Debug, Clone)]
pub struct TradeSession {
    id: SessionId,
    actor: Actor,
    classifier: InputClassifier,
    trade_counter: u32,
}

impl TradeSession {
    /// Open a session for `actor`.
    pub fn new(actor: Actor, config: &TradingConfig) -> Self {
        Self {
            id: SessionId::new(),
            actor,
            classifier: InputClassifier::new(config.synthetic_click_window),
            trade_counter: 0,
        }
    }

    /// Session identifier.
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// The trading actor.
    pub const fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Trades matched during the current gesture.
    pub const fn trade_counter(&self) -> u32 {
        self.trade_counter
    }

    /// Classify a gesture, recording it if it is manual.
    pub fn classify(&mut self, gesture: &Gesture) -> Classification {
        self.classifier.classify(gesture)
    }

    /// Reset the per-gesture trade counter.
    pub const fn begin_gesture(&mut self) {
        self.trade_counter = 0;
    }

    /// Run one trade attempt against the window's current state.
    pub fn attempt(
        &mut self,
        shop: &mut Shopkeeper,
        env: &mut Collaborators<'_>,
        config: &TradingConfig,
        payout: Payout,
    ) -> AttemptOutcome {
        let Some(result) = env.window.result_stack() else {
            return AttemptOutcome::Idle(IdleReason::EmptyResult);
        };
        let (offered1, offered2) = env.window.offered_stacks();

        let Some(binding) = find_active_recipe(
            env.window.displayed_recipes(),
            offered1.as_ref(),
            offered2.as_ref(),
        ) else {
            if config.debug_empty_trades {
                tracing::debug!(actor = %self.actor.name, "not handling trade: no active recipe");
            }
            return AttemptOutcome::Idle(IdleReason::NoActiveRecipe);
        };

        if binding.recipe.result != result {
            tracing::error!(
                actor = %self.actor.name,
                shop = %shop.profile.name,
                recipe = %binding.recipe.describe(),
                displayed = %result.item_type,
                "displayed result differs from the active recipe"
            );
            return self.abort_inconsistent(shop, env);
        }

        let Some(order) = match_recipe(
            offered1.as_ref(),
            offered2.as_ref(),
            &binding.recipe,
            config.comparison,
        ) else {
            if config.debug_empty_trades {
                tracing::debug!(
                    actor = %self.actor.name,
                    recipe = %binding.recipe.describe(),
                    "not handling trade: offered items do not match the recipe"
                );
            }
            return AttemptOutcome::Idle(IdleReason::NoMatch);
        };
        let binding = RecipeBinding { order, ..binding };
        let (matched1, matched2) = binding.resolve(offered1.as_ref(), offered2.as_ref());
        let Some(matched1) = matched1 else {
            tracing::error!(
                actor = %self.actor.name,
                recipe = %binding.recipe.describe(),
                "matched recipe has no offered first item"
            );
            return self.abort_inconsistent(shop, env);
        };

        let trade_id = TradeId::new();
        let mut phase = PhaseTracker::matched(trade_id);
        self.trade_counter = self.trade_counter.saturating_add(1);

        let request = PrepareRequest {
            trade_id,
            actor: &self.actor,
            binding: &binding,
            offered1: matched1,
            offered2: matched2,
            trade_index: self.trade_counter,
        };
        let mut ctx = request.matched_context(shop);
        if let Err(reason) = prepare(shop, env.container.as_deref(), &mut ctx, config) {
            tracing::debug!(
                %trade_id,
                actor = %self.actor.name,
                shop = %shop.profile.name,
                %reason,
                "trade prevented"
            );
            phase.advance(TradePhase::Aborted);
            return abort(shop, env, ctx, reason);
        }
        phase.advance(TradePhase::Prepared);

        if env.veto.review(&ctx.summary()) == Verdict::Deny {
            tracing::debug!(%trade_id, actor = %self.actor.name, "trade vetoed");
            phase.advance(TradePhase::Aborted);
            return abort(shop, env, ctx, AbortReason::Vetoed);
        }
        phase.advance(TradePhase::Notified);

        let outcome = commit(shop, env, ctx, payout);
        phase.advance(match outcome {
            AttemptOutcome::Committed(_) => TradePhase::Applied,
            _ => TradePhase::Aborted,
        });
        outcome
    }

    /// Abort before a trade was matched. No context exists, so no hook runs.
    fn abort_inconsistent(&self, shop: &Shopkeeper, env: &mut Collaborators<'_>) -> AttemptOutcome {
        let reason = AbortReason::InternalInconsistency;
        env.events.emit(TradeEvent::Aborted(TradeAbortedDetails {
            trade_id: None,
            shopkeeper_id: shop.id(),
            actor_id: self.actor.id,
            reason,
        }));
        AttemptOutcome::Aborted(reason)
    }
}

/// Abort a matched trade, running the abort hook once.
fn abort(
    shop: &mut Shopkeeper,
    env: &mut Collaborators<'_>,
    ctx: TradeContext,
    reason: AbortReason,
) -> AttemptOutcome {
    shop.strategy_mut().on_trade_aborted(&ctx, reason);
    env.events.emit(TradeEvent::Aborted(ctx.aborted_details(reason)));
    AttemptOutcome::Aborted(reason)
}

/// Write every staged effect, rolling the container back if the payout
/// cannot be written.
fn commit(
    shop: &mut Shopkeeper,
    env: &mut Collaborators<'_>,
    ctx: TradeContext,
    payout: Payout,
) -> AttemptOutcome {
    if let Err(err) = shop
        .strategy()
        .commit_effects(&ctx, reborrow(&mut env.container))
    {
        tracing::warn!(trade_id = %ctx.trade_id, error = %err, "container write failed");
        return abort(shop, env, ctx, AbortReason::StorageWriteFailed);
    }

    if let Err(err) = payout.write(&mut *env.inventory) {
        tracing::warn!(trade_id = %ctx.trade_id, error = %err, "payout write failed");
        if let Err(rollback) = shop
            .strategy()
            .rollback_effects(&ctx, reborrow(&mut env.container))
        {
            tracing::error!(
                trade_id = %ctx.trade_id,
                error = %rollback,
                "container rollback failed"
            );
        }
        return abort(shop, env, ctx, AbortReason::StorageWriteFailed);
    }

    env.window.set_result_stack(None);
    let (left1, left2) = ctx.remaining_offered();
    env.window.set_offered_stack(BUY_SLOT_1, left1);
    env.window.set_offered_stack(BUY_SLOT_2, left2);

    shop.strategy_mut().on_trade_applied(&ctx);
    let details = ctx.committed_details();
    tracing::debug!(
        trade_id = %details.trade_id,
        recipe = %details.recipe.describe(),
        trade_index = details.trade_index,
        "trade committed"
    );
    env.events.emit(TradeEvent::Committed(details.clone()));
    AttemptOutcome::Committed(Box::new(details))
}
