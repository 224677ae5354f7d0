//! Slot-array inventory operations.
//!
//! Container and actor storage contents are plain slices of optional
//! stacks. These helpers add, remove and count items on such slices with
//! checked arithmetic, never panicking and never exceeding a stack's maximum
//! size. Callers work on a copy and write it back only when the whole
//! operation succeeded.

use merchant_types::ItemStack;

use crate::error::InventoryError;

/// Number of hotbar slots at the start of an actor's storage.
pub const HOTBAR_SIZE: usize = 9;

/// Number of slots in an actor's storage (hotbar plus main storage).
pub const PLAYER_STORAGE_SIZE: usize = 36;

/// Add `stack` to `contents`, returning the amount that did not fit.
///
/// Similar partial stacks are topped up first, in slot order. The rest goes
/// into empty slots, at most one maximum stack size per slot.
pub fn add_items(contents: &mut [Option<ItemStack>], stack: &ItemStack) -> u32 {
    let mut remaining = stack.amount;
    if remaining == 0 {
        return 0;
    }

    for slot in contents.iter_mut() {
        if remaining == 0 {
            break;
        }
        if let Some(existing) = slot {
            if existing.is_empty() || !existing.is_similar(stack) {
                continue;
            }
            let moved = existing.free_space().min(remaining);
            if moved == 0 {
                continue;
            }
            *existing = existing.with_amount(existing.amount.saturating_add(moved));
            remaining = remaining.saturating_sub(moved);
        }
    }

    let per_slot = stack.max_stack_size.max(1);
    for slot in contents.iter_mut() {
        if remaining == 0 {
            break;
        }
        if slot.as_ref().is_some_and(|s| !s.is_empty()) {
            continue;
        }
        let moved = per_slot.min(remaining);
        *slot = Some(stack.with_amount(moved));
        remaining = remaining.saturating_sub(moved);
    }

    remaining
}

/// Remove up to `amount` items matching `predicate` from `contents`.
///
/// Returns the shortfall: how many of the requested items could not be
/// removed. Emptied slots become `None`.
pub fn remove_items(
    contents: &mut [Option<ItemStack>],
    predicate: impl Fn(&ItemStack) -> bool,
    amount: u32,
) -> u32 {
    let mut remaining = amount;
    for slot in contents.iter_mut() {
        if remaining == 0 {
            break;
        }
        let Some(existing) = slot.as_ref() else {
            continue;
        };
        if existing.is_empty() || !predicate(existing) {
            continue;
        }
        let taken = existing.amount.min(remaining);
        remaining = remaining.saturating_sub(taken);
        *slot = existing.decreased_by(taken);
    }
    remaining
}

/// Total amount of items matching `predicate` in `contents`.
///
/// # Errors
///
/// Returns [`InventoryError::ArithmeticOverflow`] if the total exceeds
/// `u32`.
pub fn count_items(
    contents: &[Option<ItemStack>],
    predicate: impl Fn(&ItemStack) -> bool,
) -> Result<u32, InventoryError> {
    contents
        .iter()
        .flatten()
        .filter(|s| predicate(s))
        .try_fold(0_u32, |total, s| {
            total
                .checked_add(s.amount)
                .ok_or_else(|| InventoryError::ArithmeticOverflow {
                    context: String::from("item count overflow"),
                })
        })
}

/// Whether `contents` holds at least `amount` items matching `predicate`.
pub fn contains_at_least(
    contents: &[Option<ItemStack>],
    predicate: impl Fn(&ItemStack) -> bool,
    amount: u32,
) -> bool {
    // An overflowing count certainly covers any u32 amount.
    !matches!(count_items(contents, predicate), Ok(count) if count < amount)
}

/// Reverse the hotbar and the main storage sections independently.
///
/// Applying it twice restores the original layout.
fn reverse_client_sections(contents: &mut [Option<ItemStack>]) {
    let split = HOTBAR_SIZE.min(contents.len());
    let (hotbar, main) = contents.split_at_mut(split);
    hotbar.reverse();
    main.reverse();
}

/// Add `stack` to an actor's storage in the order the client fills it when
/// shift-clicking a trade result: the hotbar from its last slot down, then
/// the main storage from its last slot down.
///
/// Returns the amount that did not fit.
pub fn add_items_client_order(contents: &mut [Option<ItemStack>], stack: &ItemStack) -> u32 {
    reverse_client_sections(contents);
    let leftover = add_items(contents, stack);
    reverse_client_sections(contents);
    leftover
}
