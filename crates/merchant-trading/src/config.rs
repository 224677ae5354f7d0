//! Runtime trading settings.
//!
//! [`TradingConfig`] bundles every tunable the trading pipeline reads, so no
//! component consults ambient globals. The core crate builds it from
//! `merchant-config.yaml`; tests construct it directly and override single
//! fields.

use std::time::Duration;

use merchant_types::{ItemComparison, ItemStack};
use serde::{Deserialize, Serialize};

use crate::classifier::DEFAULT_SYNTHETIC_WINDOW;

/// Percentage tax taken from shop earnings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxPolicy {
    /// Tax rate in percent (0--100).
    pub rate_percent: u32,
    /// Round the tax up instead of down.
    pub round_up: bool,
}

/// Optional high-denomination currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighCurrency {
    /// The high currency item (amount ignored).
    pub item: ItemStack,
    /// Worth of one high currency item in low currency units.
    pub value: u32,
    /// Prices and payouts at or below this amount use low currency only.
    pub min_cost: u32,
}

/// Currency items used by player shops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// The low currency item (amount ignored).
    pub item: ItemStack,
    /// High currency, if enabled.
    pub high: Option<HighCurrency>,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            item: ItemStack::new("emerald", 1),
            high: Some(HighCurrency {
                item: ItemStack::new("emerald_block", 1),
                value: 9,
                min_cost: 20,
            }),
        }
    }
}

/// Every setting the trading pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradingConfig {
    /// How offered stacks are compared against recipe requirements
    /// (default: lenient).
    pub comparison: ItemComparison,

    /// Refuse trades of an owner with their own shop (default: true).
    pub prevent_trading_with_own_shop: bool,

    /// Refuse trades while the shop owner is online (default: false).
    pub prevent_trading_while_owner_online: bool,

    /// Tax applied to shop earnings.
    pub tax: TaxPolicy,

    /// Currency items.
    pub currency: CurrencyConfig,

    /// Window in which a shift-click on another slot counts as synthetic
    /// (default: 250 ms).
    pub synthetic_click_window: Duration,

    /// Log every trade attempt that ends without a match.
    pub debug_empty_trades: bool,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            comparison: ItemComparison::Lenient,
            prevent_trading_with_own_shop: true,
            prevent_trading_while_owner_online: false,
            tax: TaxPolicy::default(),
            currency: CurrencyConfig::default(),
            synthetic_click_window: DEFAULT_SYNTHETIC_WINDOW,
            debug_empty_trades: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_lenient_and_untaxed() {
        let config = TradingConfig::default();
        assert_eq!(config.comparison, ItemComparison::Lenient);
        assert_eq!(config.tax.rate_percent, 0);
        assert!(config.prevent_trading_with_own_shop);
        assert!(!config.prevent_trading_while_owner_online);
        assert_eq!(config.synthetic_click_window, Duration::from_millis(250));
    }

    #[test]
    fn default_currency_has_high_denomination() {
        let currency = CurrencyConfig::default();
        let high = currency.high.as_ref().map(|h| (h.value, h.min_cost));
        assert_eq!(high, Some((9, 20)));
    }
}
