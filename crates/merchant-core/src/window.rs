//! Collaborator seams the engine drives during one gesture.
//!
//! The engine never owns the trading window, the actor's inventory, the
//! veto hook or the event sink. It borrows them mutably for the duration of
//! a single gesture through [`Collaborators`].

use merchant_ledger::TradeLedger;
use merchant_trading::{CurrencyConfig, ItemContainer, ShopStrategy as _, StorageError};
use merchant_types::{Actor, ItemStack, PendingTradeSummary, TradeEvent, TradingRecipe, Verdict};

use crate::shopkeeper::Shopkeeper;

/// The trading window an actor has open with a shopkeeper.
pub trait TradingWindow {
    /// Whether the window is currently open for `actor`.
    fn is_open_for(&self, actor: &Actor) -> bool;

    /// The stacks in the two offered slots, in slot order.
    fn offered_stacks(&self) -> (Option<ItemStack>, Option<ItemStack>);

    /// Replace the stack in an offered slot (`BUY_SLOT_1` or `BUY_SLOT_2`).
    ///
    /// The window recomputes its displayed result afterwards, like a
    /// client does.
    fn set_offered_stack(&mut self, slot: i32, stack: Option<ItemStack>);

    /// The stack displayed in the result slot.
    fn result_stack(&self) -> Option<ItemStack>;

    /// Replace the stack displayed in the result slot.
    fn set_result_stack(&mut self, stack: Option<ItemStack>);

    /// The recipes the window currently displays, in display order.
    fn displayed_recipes(&self) -> &[TradingRecipe];

    /// Replace the displayed recipes.
    fn update_recipes(&mut self, recipes: Vec<TradingRecipe>);
}

/// Something that can list the recipes a shop offers to an actor.
pub trait RecipeSource {
    /// Recipes in display order.
    fn trading_recipes_for(&self, actor: &Actor) -> Vec<TradingRecipe>;
}

/// A shopkeeper together with its current container, viewed as a
/// [`RecipeSource`].
pub struct ShopRecipes<'a> {
    /// The shopkeeper.
    pub shop: &'a Shopkeeper,
    /// Its container, `None` when missing.
    pub container: Option<&'a dyn ItemContainer>,
    /// Currency settings used to project prices.
    pub currency: &'a CurrencyConfig,
}

impl RecipeSource for ShopRecipes<'_> {
    fn trading_recipes_for(&self, actor: &Actor) -> Vec<TradingRecipe> {
        let stock = match self.container.map(ItemContainer::read_contents) {
            Some(Ok(contents)) => Some(contents),
            Some(Err(err)) => {
                tracing::warn!(shop = %self.shop.profile.name, error = %err, "cannot read shop stock");
                None
            }
            None => None,
        };
        let recipes = self
            .shop
            .strategy()
            .trading_recipes(self.currency, stock.as_deref());
        tracing::trace!(
            actor = %actor.name,
            shop = %self.shop.profile.name,
            count = recipes.len(),
            "listed trading recipes"
        );
        recipes
    }
}

/// The actor's own inventory.
///
/// Storage has 36 slots: the hotbar in `0..=8` and the main storage in
/// `9..=35`.
pub trait ActorInventory {
    /// Snapshot of the storage slots.
    fn storage(&self) -> Vec<Option<ItemStack>>;

    /// Replace the storage slots.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the write was rejected; the previous
    /// storage is then unchanged.
    fn set_storage(&mut self, contents: Vec<Option<ItemStack>>) -> Result<(), StorageError>;

    /// The stack held on the cursor.
    fn cursor(&self) -> Option<ItemStack>;

    /// Replace the stack held on the cursor.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the write was rejected.
    fn set_cursor(&mut self, stack: Option<ItemStack>) -> Result<(), StorageError>;
}

/// External listener that may cancel a pending trade.
pub trait VetoHook {
    /// Decide whether the trade may proceed.
    fn review(&mut self, summary: &PendingTradeSummary) -> Verdict;
}

impl<F> VetoHook for F
where
    F: FnMut(&PendingTradeSummary) -> Verdict,
{
    fn review(&mut self, summary: &PendingTradeSummary) -> Verdict {
        self(summary)
    }
}

/// Veto hook that allows every trade.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl VetoHook for AllowAll {
    fn review(&mut self, _summary: &PendingTradeSummary) -> Verdict {
        Verdict::Allow
    }
}

/// Receiver of the engine's notifications.
pub trait EventSink {
    /// Handle one event.
    fn emit(&mut self, event: TradeEvent);
}

impl EventSink for Vec<TradeEvent> {
    fn emit(&mut self, event: TradeEvent) {
        self.push(event);
    }
}

impl EventSink for TradeLedger {
    fn emit(&mut self, event: TradeEvent) {
        if let Err(err) = self.record_event(&event) {
            tracing::error!(error = %err, "failed to record trade event");
        }
    }
}

/// Everything the engine borrows for one gesture.
pub struct Collaborators<'a> {
    /// The open trading window.
    pub window: &'a mut dyn TradingWindow,
    /// The trading actor's inventory.
    pub inventory: &'a mut dyn ActorInventory,
    /// The shop's container, `None` when missing.
    pub container: Option<&'a mut dyn ItemContainer>,
    /// Veto hook consulted before commit.
    pub veto: &'a mut dyn VetoHook,
    /// Receiver of trade events.
    pub events: &'a mut dyn EventSink,
}
