//! Currency handling for player shops.
//!
//! Prices are whole amounts of the low currency. When a high-denomination
//! currency is enabled, prices and payouts above its minimum cost are split
//! into high currency first and the remainder in low currency.

use merchant_types::ItemStack;

use crate::config::{CurrencyConfig, HighCurrency};
use crate::inventory;

impl CurrencyConfig {
    /// `amount` items of the low currency.
    pub fn low_stack(&self, amount: u32) -> ItemStack {
        self.item.with_amount(amount)
    }

    /// `amount` items of the high currency, if enabled.
    pub fn high_stack(&self, amount: u32) -> Option<ItemStack> {
        self.high.as_ref().map(|h| h.item.with_amount(amount))
    }

    /// Whether `stack` is low currency.
    pub fn is_low(&self, stack: &ItemStack) -> bool {
        stack.is_similar(&self.item)
    }

    /// Whether `stack` is high currency.
    pub fn is_high(&self, stack: &ItemStack) -> bool {
        self.high.as_ref().is_some_and(|h| stack.is_similar(&h.item))
    }

    /// The high currency, when enabled and applicable to `amount`.
    fn high_for(&self, amount: u32) -> Option<&HighCurrency> {
        self.high
            .as_ref()
            .filter(|h| h.value > 0 && amount > h.min_cost)
    }

    /// Split a price into `(high, low)` currency counts for a recipe cost.
    ///
    /// The high count is capped at one stack of the high currency.
    pub fn split_price(&self, price: u32) -> (u32, u32) {
        let Some(high) = self.high_for(price) else {
            return (0, price);
        };
        let high_count = price
            .checked_div(high.value)
            .unwrap_or(0)
            .min(high.item.max_stack_size);
        let low_count = price.saturating_sub(high_count.saturating_mul(high.value));
        (high_count, low_count)
    }

    /// The recipe cost stacks for `price`: `(item1, item2)`.
    ///
    /// High currency goes into `item1` and low currency into `item2`; with no
    /// high currency the low currency takes `item1`. Returns `None` for a
    /// zero price or when the low part does not fit into one stack.
    pub fn price_to_cost(&self, price: u32) -> Option<(ItemStack, Option<ItemStack>)> {
        let (high_count, low_count) = self.split_price(price);
        if low_count > self.item.max_stack_size {
            tracing::warn!(price, low_count, "price does not fit into a recipe cost");
            return None;
        }
        let high = self.high_stack(high_count).filter(|s| !s.is_empty());
        let low = Some(self.low_stack(low_count)).filter(|s| !s.is_empty());
        match (high, low) {
            (Some(high), low) => Some((high, low)),
            (None, Some(low)) => Some((low, None)),
            (None, None) => None,
        }
    }

    /// Worth of `stack` in low currency units, zero for non-currency items.
    pub fn value_of(&self, stack: &ItemStack) -> u32 {
        if self.is_low(stack) {
            return stack.amount;
        }
        match &self.high {
            Some(high) if stack.is_similar(&high.item) => stack.amount.saturating_mul(high.value),
            _ => 0,
        }
    }

    /// Total currency worth held in `contents`, saturating at `u32::MAX`.
    pub fn total_value(&self, contents: &[Option<ItemStack>]) -> u32 {
        contents
            .iter()
            .flatten()
            .fold(0_u32, |total, stack| total.saturating_add(self.value_of(stack)))
    }
}

/// Add a payout worth `amount` low currency units to `contents`.
///
/// High currency is added first when enabled and `amount` exceeds its
/// minimum cost; whatever high currency did not fit is paid in low currency.
/// Returns the low currency amount that did not fit.
pub fn add_currency(
    contents: &mut [Option<ItemStack>],
    currency: &CurrencyConfig,
    amount: u32,
) -> u32 {
    let mut remaining = amount;
    if let Some(high) = currency.high_for(remaining) {
        let high_count = remaining.checked_div(high.value).unwrap_or(0);
        if high_count > 0 {
            let not_added = inventory::add_items(contents, &high.item.with_amount(high_count));
            let added = high_count.saturating_sub(not_added);
            remaining = remaining.saturating_sub(added.saturating_mul(high.value));
        }
    }
    if remaining == 0 {
        return 0;
    }
    inventory::add_items(contents, &currency.low_stack(remaining))
}

/// Remove currency worth `amount` low currency units from `contents`.
///
/// Low currency is taken first. A remaining debt is paid with high currency,
/// and the change is returned to `contents` as low currency. Returns `false`
/// and leaves `contents` untouched when the currency is insufficient or the
/// change does not fit.
pub fn remove_currency(
    contents: &mut Vec<Option<ItemStack>>,
    currency: &CurrencyConfig,
    amount: u32,
) -> bool {
    let mut working = contents.clone();
    let shortfall = inventory::remove_items(&mut working, |s| currency.is_low(s), amount);
    if shortfall > 0 {
        let Some(high) = currency.high.as_ref().filter(|h| h.value > 0) else {
            return false;
        };
        // Round up to whole high currency items.
        let high_count = shortfall.div_ceil(high.value);
        if inventory::remove_items(&mut working, |s| currency.is_high(s), high_count) > 0 {
            return false;
        }
        let change = high_count
            .saturating_mul(high.value)
            .saturating_sub(shortfall);
        if change > 0 && inventory::add_items(&mut working, &currency.low_stack(change)) > 0 {
            return false;
        }
    }
    *contents = working;
    true
}
