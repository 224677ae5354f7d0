//! Trading recipes: the transient projection of a shopkeeper's offers that
//! the exchange engine matches offered items against.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::item::{ItemStack, non_empty, stack_amount};

/// Errors raised when building an invalid recipe.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeError {
    /// The first required item must never be empty.
    #[error("recipe item1 must not be empty")]
    EmptyFirstItem,

    /// A recipe must produce something.
    #[error("recipe result must not be empty")]
    EmptyResult,
}

/// Two required input stacks and one result stack.
///
/// `item1` is never empty; `item2` is optional. Build recipes through
/// [`TradingRecipe::new`] to uphold that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TradingRecipe {
    /// First required stack (mandatory).
    pub item1: ItemStack,
    /// Second required stack (optional).
    #[serde(default)]
    pub item2: Option<ItemStack>,
    /// The stack the actor receives.
    pub result: ItemStack,
    /// Whether the shop currently cannot supply this trade.
    #[serde(default)]
    pub out_of_stock: bool,
}

impl TradingRecipe {
    /// Build a recipe, normalizing an empty `item2` to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeError`] if `item1` or `result` is empty.
    pub fn new(
        item1: ItemStack,
        item2: Option<ItemStack>,
        result: ItemStack,
    ) -> Result<Self, RecipeError> {
        if item1.is_empty() {
            return Err(RecipeError::EmptyFirstItem);
        }
        if result.is_empty() {
            return Err(RecipeError::EmptyResult);
        }
        Ok(Self {
            item1,
            item2: non_empty(item2),
            result,
            out_of_stock: false,
        })
    }

    /// Mark the recipe as out of stock.
    #[must_use]
    pub const fn with_out_of_stock(mut self, out_of_stock: bool) -> Self {
        self.out_of_stock = out_of_stock;
        self
    }

    /// Whether the recipe upholds its invariants.
    pub fn is_valid(&self) -> bool {
        !self.item1.is_empty() && !self.result.is_empty()
    }

    /// Amount of `item2` required, zero when absent.
    pub fn item2_amount(&self) -> u32 {
        stack_amount(self.item2.as_ref())
    }

    /// Whether `other` is still "the same recipe" (result similarity).
    pub fn same_result(&self, other: &Self) -> bool {
        self.result.is_similar(&other.result)
    }

    /// Short human-readable description for logs.
    pub fn describe(&self) -> String {
        let item2 = self
            .item2
            .as_ref()
            .map(|s| format!(" + {}x{}", s.amount, s.item_type))
            .unwrap_or_default();
        format!(
            "{}x{}{} -> {}x{}",
            self.item1.amount, self.item1.item_type, item2, self.result.amount, self.result.item_type
        )
    }
}
