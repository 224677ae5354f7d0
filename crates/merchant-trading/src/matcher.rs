//! Recipe matching: do the two offered stacks pay for a recipe?
//!
//! A recipe requires `item1` and optionally `item2`. The actor may place the
//! offered stacks in either slot order, so matching tries the as-is order
//! first and the swapped order second. When both orders match, the as-is
//! order wins.
//!
//! Each position is satisfied when the offered quantity is at least the
//! required quantity and the offered stack satisfies the required identity
//! under the active [`ItemComparison`]. An absent requirement is satisfied
//! only by an absent offered stack.

use merchant_types::{ItemComparison, ItemStack, SlotOrder, TradingRecipe};

/// Whether a single offered stack satisfies a single requirement.
fn position_satisfied(
    offered: Option<&ItemStack>,
    required: Option<&ItemStack>,
    comparison: ItemComparison,
) -> bool {
    let offered = offered.filter(|s| !s.is_empty());
    let required = required.filter(|s| !s.is_empty());
    match (offered, required) {
        (None, None) => true,
        (Some(_), None) | (None, Some(_)) => false,
        (Some(offered), Some(required)) => {
            offered.amount >= required.amount && offered.satisfies(required, comparison)
        }
    }
}

/// Match the offered stacks against `recipe` in a fixed order.
fn matches_in_order(
    offered1: Option<&ItemStack>,
    offered2: Option<&ItemStack>,
    recipe: &TradingRecipe,
    order: SlotOrder,
    comparison: ItemComparison,
) -> bool {
    let (required1, required2) = match order {
        SlotOrder::AsIs => (Some(&recipe.item1), recipe.item2.as_ref()),
        SlotOrder::Swapped => (recipe.item2.as_ref(), Some(&recipe.item1)),
    };
    position_satisfied(offered1, required1, comparison)
        && position_satisfied(offered2, required2, comparison)
}

/// Decide whether the two offered stacks satisfy `recipe`.
///
/// Returns the slot order that matched, trying [`SlotOrder::AsIs`] first.
/// `None` means no match, which is an expected outcome and not an error.
pub fn match_recipe(
    offered1: Option<&ItemStack>,
    offered2: Option<&ItemStack>,
    recipe: &TradingRecipe,
    comparison: ItemComparison,
) -> Option<SlotOrder> {
    if !recipe.is_valid() {
        return None;
    }
    [SlotOrder::AsIs, SlotOrder::Swapped]
        .into_iter()
        .find(|order| matches_in_order(offered1, offered2, recipe, *order, comparison))
}

/// A recipe selected for the current offered stacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeBinding {
    /// Position of the recipe in the displayed list.
    pub index: usize,
    /// The selected recipe.
    pub recipe: TradingRecipe,
    /// How the offered stacks line up with the recipe.
    pub order: SlotOrder,
}

impl RecipeBinding {
    /// The offered stacks reordered to `(matches item1, matches item2)`.
    pub fn resolve<'a>(
        &self,
        offered1: Option<&'a ItemStack>,
        offered2: Option<&'a ItemStack>,
    ) -> (Option<&'a ItemStack>, Option<&'a ItemStack>) {
        match self.order {
            SlotOrder::AsIs => (offered1, offered2),
            SlotOrder::Swapped => (offered2, offered1),
        }
    }
}

/// The recipe the trading window would display for the offered stacks.
///
/// Mirrors the client: the first recipe in display order that is not out of
/// stock and matches under lenient comparison.
pub fn find_active_recipe(
    recipes: &[TradingRecipe],
    offered1: Option<&ItemStack>,
    offered2: Option<&ItemStack>,
) -> Option<RecipeBinding> {
    recipes
        .iter()
        .enumerate()
        .filter(|(_, recipe)| !recipe.out_of_stock)
        .find_map(|(index, recipe)| {
            match_recipe(offered1, offered2, recipe, ItemComparison::Lenient).map(|order| {
                RecipeBinding {
                    index,
                    recipe: recipe.clone(),
                    order,
                }
            })
        })
}
