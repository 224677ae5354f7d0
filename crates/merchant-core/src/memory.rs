//! In-memory collaborators, used by the replay binary and by tests.

use merchant_trading::StorageError;
use merchant_trading::find_active_recipe;
use merchant_trading::inventory::PLAYER_STORAGE_SIZE;
use merchant_types::{Actor, ActorId, BUY_SLOT_1, BUY_SLOT_2, ItemStack, TradingRecipe, non_empty};

use crate::window::{ActorInventory, TradingWindow};

// ---------------------------------------------------------------------------
// Trading window
// ---------------------------------------------------------------------------

/// A trading window held in memory.
///
/// Like a client, it reselects the active recipe and redisplays its result
/// whenever an offered slot changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryWindow {
    viewer: ActorId,
    open: bool,
    slot1: Option<ItemStack>,
    slot2: Option<ItemStack>,
    result: Option<ItemStack>,
    recipes: Vec<TradingRecipe>,
    recipe_updates: u32,
}

impl MemoryWindow {
    /// An open window for `viewer` displaying `recipes`.
    pub const fn new(viewer: ActorId, recipes: Vec<TradingRecipe>) -> Self {
        Self {
            viewer,
            open: true,
            slot1: None,
            slot2: None,
            result: None,
            recipes,
            recipe_updates: 0,
        }
    }

    /// Put stacks into both offered slots.
    pub fn place(&mut self, slot1: Option<ItemStack>, slot2: Option<ItemStack>) {
        self.slot1 = non_empty(slot1);
        self.slot2 = non_empty(slot2);
        self.reselect();
    }

    /// Close the window.
    pub const fn close(&mut self) {
        self.open = false;
    }

    /// How many times the displayed recipes were replaced.
    pub const fn recipe_updates(&self) -> u32 {
        self.recipe_updates
    }

    fn reselect(&mut self) {
        self.result = find_active_recipe(&self.recipes, self.slot1.as_ref(), self.slot2.as_ref())
            .map(|binding| binding.recipe.result);
    }
}

impl TradingWindow for MemoryWindow {
    fn is_open_for(&self, actor: &Actor) -> bool {
        self.open && self.viewer == actor.id
    }

    fn offered_stacks(&self) -> (Option<ItemStack>, Option<ItemStack>) {
        (self.slot1.clone(), self.slot2.clone())
    }

    fn set_offered_stack(&mut self, slot: i32, stack: Option<ItemStack>) {
        match slot {
            BUY_SLOT_1 => self.slot1 = non_empty(stack),
            BUY_SLOT_2 => self.slot2 = non_empty(stack),
            _ => {
                tracing::warn!(slot, "ignoring write to a slot that is not an offered slot");
                return;
            }
        }
        self.reselect();
    }

    fn result_stack(&self) -> Option<ItemStack> {
        self.result.clone()
    }

    fn set_result_stack(&mut self, stack: Option<ItemStack>) {
        self.result = non_empty(stack);
    }

    fn displayed_recipes(&self) -> &[TradingRecipe] {
        &self.recipes
    }

    fn update_recipes(&mut self, mut recipes: Vec<TradingRecipe>) {
        // The displayed list never shrinks; trailing entries stay as
        // unavailable placeholders until the window is reopened.
        if let Some(tail) = self.recipes.get(recipes.len()..) {
            recipes.extend(tail.iter().map(|r| r.clone().with_out_of_stock(true)));
        }
        self.recipes = recipes;
        self.recipe_updates = self.recipe_updates.saturating_add(1);
        self.reselect();
    }
}

// ---------------------------------------------------------------------------
// Actor inventory
// ---------------------------------------------------------------------------

/// An actor inventory held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryInventory {
    storage: Vec<Option<ItemStack>>,
    cursor: Option<ItemStack>,
    reject_writes: bool,
}

impl MemoryInventory {
    /// An empty inventory with the standard 36 storage slots.
    pub fn new() -> Self {
        Self::with_storage(vec![None; PLAYER_STORAGE_SIZE])
    }

    /// An inventory holding `storage`.
    pub const fn with_storage(storage: Vec<Option<ItemStack>>) -> Self {
        Self {
            storage,
            cursor: None,
            reject_writes: false,
        }
    }

    /// Current storage slots.
    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.storage
    }

    /// Make every following write fail.
    pub const fn set_reject_writes(&mut self, reject: bool) {
        self.reject_writes = reject;
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.reject_writes {
            return Err(StorageError::WriteRejected {
                reason: String::from("inventory is locked"),
            });
        }
        Ok(())
    }
}

impl Default for MemoryInventory {
    fn default() -> Self {
        Self::new()
    }
}

impl ActorInventory for MemoryInventory {
    fn storage(&self) -> Vec<Option<ItemStack>> {
        self.storage.clone()
    }

    fn set_storage(&mut self, contents: Vec<Option<ItemStack>>) -> Result<(), StorageError> {
        self.check_writable()?;
        self.storage = contents;
        Ok(())
    }

    fn cursor(&self) -> Option<ItemStack> {
        self.cursor.clone()
    }

    fn set_cursor(&mut self, stack: Option<ItemStack>) -> Result<(), StorageError> {
        self.check_writable()?;
        self.cursor = non_empty(stack);
        Ok(())
    }
}
