//! The exchange engine: one entry point per input gesture.
//!
//! Only gestures on the result slot trade. The gesture kind decides where
//! the result goes:
//!
//! | Gesture | Behavior |
//! |---------|----------|
//! | `PickupAll`, `PickupHalf` | one trade onto the cursor |
//! | `HotbarSwap` | one trade into an empty hotbar slot |
//! | `MoveToOtherInventory` | batch trade into storage |
//! | `CloneStack` | ignored |
//! | `CollectToCursor` | not handled |
//! | anything else | unsupported |
//!
//! A `CollectToCursor` while the cursor holds the result item is blocked on
//! every slot, result slot or not.

use std::collections::BTreeMap;

use merchant_trading::inventory::HOTBAR_SIZE;
use merchant_trading::{Classification, ItemContainer, TradingConfig};
use merchant_types::{
    Actor, ActorId, Gesture, GestureKind, SessionId, TradeEvent, TradingRecipe,
};

use crate::batch::run_batch;
use crate::session::{AttemptOutcome, Payout, TradeSession};
use crate::shopkeeper::Shopkeeper;
use crate::window::{Collaborators, RecipeSource, ShopRecipes};

/// Why a gesture was not processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The actor has no open session.
    NoSession,
    /// The window is not open for the actor.
    WindowClosed,
    /// The gesture does not target the result slot.
    NotResultSlot,
    /// Creative-mode copies never trade.
    CloneStack,
    /// The gesture left the window untouched.
    NotHandled,
}

/// What the engine did with a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// The gesture was not processed.
    Ignored(IgnoreReason),
    /// A client-generated duplicate; the host must cancel it.
    Synthetic,
    /// A gesture on the result slot the engine does not support; the host
    /// must cancel it.
    Unsupported,
    /// The gesture went through the trading pipeline.
    Traded {
        /// Number of committed trades.
        commits: u32,
    },
}

/// Dispatches gestures to per-actor trade sessions.
#[derive(Debug, Clone)]
pub struct ExchangeEngine {
    config: TradingConfig,
    sessions: BTreeMap<ActorId, TradeSession>,
}

impl ExchangeEngine {
    /// Create an engine with the given settings.
    pub const fn new(config: TradingConfig) -> Self {
        Self {
            config,
            sessions: BTreeMap::new(),
        }
    }

    /// Active settings.
    pub const fn config(&self) -> &TradingConfig {
        &self.config
    }

    /// Start a session for `actor`, replacing any previous one.
    pub fn open_session(&mut self, actor: Actor) -> SessionId {
        let session = TradeSession::new(actor, &self.config);
        let id = session.id();
        tracing::debug!(session_id = %id, actor = %session.actor().name, "session opened");
        self.sessions.insert(session.actor().id, session);
        id
    }

    /// End the session of `actor_id`.
    pub fn close_session(&mut self, actor_id: ActorId) -> Option<TradeSession> {
        self.sessions.remove(&actor_id)
    }

    /// The session of `actor_id`.
    pub fn session(&self, actor_id: ActorId) -> Option<&TradeSession> {
        self.sessions.get(&actor_id)
    }

    /// The recipes `shop` offers to `actor` right now.
    pub fn recipes_for(
        &self,
        actor: &Actor,
        shop: &Shopkeeper,
        container: Option<&dyn ItemContainer>,
    ) -> Vec<TradingRecipe> {
        ShopRecipes {
            shop,
            container,
            currency: &self.config.currency,
        }
        .trading_recipes_for(actor)
    }

    /// Process one gesture of `actor_id` on the window it has open with
    /// `shop`.
    pub fn handle_gesture(
        &mut self,
        actor_id: ActorId,
        shop: &mut Shopkeeper,
        gesture: &Gesture,
        env: &mut Collaborators<'_>,
    ) -> GestureOutcome {
        let config = &self.config;
        let Some(session) = self.sessions.get_mut(&actor_id) else {
            return GestureOutcome::Ignored(IgnoreReason::NoSession);
        };
        if !env.window.is_open_for(session.actor()) {
            return GestureOutcome::Ignored(IgnoreReason::WindowClosed);
        }
        if session.classify(gesture) == Classification::Synthetic {
            tracing::debug!(
                actor = %session.actor().name,
                slot = gesture.slot,
                "ignoring synthetic shift-click"
            );
            return GestureOutcome::Synthetic;
        }
        if gesture.kind == GestureKind::CollectToCursor && cursor_holds_result(env) {
            tracing::debug!(
                actor = %session.actor().name,
                slot = gesture.slot,
                "blocking collect onto the cursor"
            );
            return GestureOutcome::Unsupported;
        }
        if !gesture.targets_result() {
            return GestureOutcome::Ignored(IgnoreReason::NotResultSlot);
        }
        session.begin_gesture();

        let commits = match gesture.kind {
            GestureKind::CloneStack => return GestureOutcome::Ignored(IgnoreReason::CloneStack),
            GestureKind::CollectToCursor => return GestureOutcome::Ignored(IgnoreReason::NotHandled),
            GestureKind::PickupAll | GestureKind::PickupHalf => {
                trade_onto_cursor(session, shop, env, config)
            }
            GestureKind::HotbarSwap => trade_into_hotbar(session, shop, env, config, gesture),
            GestureKind::MoveToOtherInventory => run_batch(session, shop, env, config).commits,
            GestureKind::DropOneSlot
            | GestureKind::DropAllSlot
            | GestureKind::PlaceAll
            | GestureKind::Other => {
                tracing::debug!(
                    actor = %session.actor().name,
                    kind = ?gesture.kind,
                    "unsupported action on the result slot"
                );
                return GestureOutcome::Unsupported;
            }
        };

        if commits > 0 {
            tracing::info!(
                actor = %session.actor().name,
                shop = %shop.profile.name,
                commits,
                "trades committed"
            );
            refresh_recipes(session.actor(), shop, env, config);
        }
        GestureOutcome::Traded { commits }
    }
}

fn cursor_holds_result(env: &Collaborators<'_>) -> bool {
    match (env.inventory.cursor(), env.window.result_stack()) {
        (Some(cursor), Some(result)) => cursor.is_similar(&result),
        _ => false,
    }
}

fn trade_onto_cursor(
    session: &mut TradeSession,
    shop: &mut Shopkeeper,
    env: &mut Collaborators<'_>,
    config: &TradingConfig,
) -> u32 {
    let Some(result) = env.window.result_stack() else {
        return 0;
    };
    let payout = match env.inventory.cursor() {
        None => result,
        Some(cursor) if cursor.is_similar(&result) => {
            match cursor.amount.checked_add(result.amount) {
                Some(total) if total <= cursor.max_stack_size => cursor.with_amount(total),
                _ => {
                    tracing::debug!(actor = %session.actor().name, "cursor cannot hold the result");
                    return 0;
                }
            }
        }
        Some(_) => {
            tracing::debug!(actor = %session.actor().name, "cursor holds a different item");
            return 0;
        }
    };
    committed(session.attempt(shop, env, config, Payout::Cursor(payout)))
}

fn trade_into_hotbar(
    session: &mut TradeSession,
    shop: &mut Shopkeeper,
    env: &mut Collaborators<'_>,
    config: &TradingConfig,
    gesture: &Gesture,
) -> u32 {
    let Some(index) = gesture
        .hotbar_button
        .map(usize::from)
        .filter(|button| *button < HOTBAR_SIZE)
    else {
        tracing::debug!(actor = %session.actor().name, "hotbar swap without a valid button");
        return 0;
    };
    let Some(result) = env.window.result_stack() else {
        return 0;
    };
    if !matches!(env.inventory.storage().get(index), Some(None)) {
        tracing::debug!(actor = %session.actor().name, slot = index, "hotbar slot is occupied");
        return 0;
    }
    committed(session.attempt(
        shop,
        env,
        config,
        Payout::Slot {
            index,
            stack: result,
        },
    ))
}

fn committed(outcome: AttemptOutcome) -> u32 {
    match outcome {
        AttemptOutcome::Committed(_) => 1,
        AttemptOutcome::Idle(_) | AttemptOutcome::Aborted(_) => 0,
    }
}

/// Re-query the shop's recipes after trades and announce the change.
fn refresh_recipes(
    actor: &Actor,
    shop: &Shopkeeper,
    env: &mut Collaborators<'_>,
    config: &TradingConfig,
) {
    let fresh = ShopRecipes {
        shop,
        container: env.container.as_deref(),
        currency: &config.currency,
    }
    .trading_recipes_for(actor);
    if fresh.as_slice() != env.window.displayed_recipes() {
        env.window.update_recipes(fresh);
    }
    env.events.emit(TradeEvent::RecipesChanged {
        shopkeeper_id: shop.id(),
        actor_id: actor.id,
    });
}
