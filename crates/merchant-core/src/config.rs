//! Configuration loading and typed config structures for the merchant
//! exchange engine.
//!
//! The canonical configuration lives in `merchant-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror the
//! YAML structure, a loader, and the conversion into the runtime
//! [`TradingConfig`].

use std::path::Path;
use std::time::Duration;

use merchant_trading::{CurrencyConfig, HighCurrency, TaxPolicy, TradingConfig};
use merchant_types::{ItemComparison, ItemMeta, ItemStack};
use serde::Deserialize;

/// Name of the debug option that logs trade attempts without a match.
pub const DEBUG_EMPTY_TRADES: &str = "empty-trades";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
///
/// Mirrors the structure of `merchant-config.yaml`. All fields have
/// defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MerchantConfig {
    /// Trading rules.
    #[serde(default)]
    pub trading: TradingSection,

    /// Tax on shop earnings.
    #[serde(default)]
    pub tax: TaxSection,

    /// Currency items.
    #[serde(default)]
    pub currency: CurrencySection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MerchantConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `MERCHANT_LOG` environment variable overrides `logging.level`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.logging.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// The runtime settings read by the trading pipeline.
    pub fn trading_config(&self) -> TradingConfig {
        TradingConfig {
            comparison: if self.trading.use_strict_item_comparison {
                ItemComparison::Strict
            } else {
                ItemComparison::Lenient
            },
            prevent_trading_with_own_shop: self.trading.prevent_trading_with_own_shop,
            prevent_trading_while_owner_online: self.trading.prevent_trading_while_owner_online,
            tax: TaxPolicy {
                rate_percent: self.tax.rate,
                round_up: self.tax.round_up,
            },
            currency: self.currency.to_currency_config(),
            synthetic_click_window: Duration::from_millis(self.trading.synthetic_click_window_ms),
            debug_empty_trades: self.logging.debug_option(DEBUG_EMPTY_TRADES),
        }
    }
}

/// Trading rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TradingSection {
    /// Require offered items to equal the required items exactly.
    #[serde(default)]
    pub use_strict_item_comparison: bool,

    /// Refuse trades of an owner with their own shop.
    #[serde(default = "default_true")]
    pub prevent_trading_with_own_shop: bool,

    /// Refuse trades while the shop owner is online.
    #[serde(default)]
    pub prevent_trading_while_owner_online: bool,

    /// Window in milliseconds for detecting synthetic shift-clicks.
    #[serde(default = "default_synthetic_click_window_ms")]
    pub synthetic_click_window_ms: u64,
}

impl Default for TradingSection {
    fn default() -> Self {
        Self {
            use_strict_item_comparison: false,
            prevent_trading_with_own_shop: default_true(),
            prevent_trading_while_owner_online: false,
            synthetic_click_window_ms: default_synthetic_click_window_ms(),
        }
    }
}

/// Tax on shop earnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaxSection {
    /// Tax rate in percent.
    #[serde(default)]
    pub rate: u32,

    /// Round the tax up instead of down.
    #[serde(default)]
    pub round_up: bool,
}

/// Currency items.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CurrencySection {
    /// Item type of the low currency.
    #[serde(default = "default_currency_item")]
    pub item: String,

    /// Optional display name of the low currency.
    #[serde(default)]
    pub item_name: Option<String>,

    /// Item type of the high currency; empty disables it.
    #[serde(default = "default_high_currency_item")]
    pub high_item: String,

    /// Optional display name of the high currency.
    #[serde(default)]
    pub high_item_name: Option<String>,

    /// Worth of one high currency item in low currency.
    #[serde(default = "default_high_currency_value")]
    pub high_value: u32,

    /// Amounts at or below this use low currency only.
    #[serde(default = "default_high_currency_min_cost")]
    pub high_min_cost: u32,
}

impl Default for CurrencySection {
    fn default() -> Self {
        Self {
            item: default_currency_item(),
            item_name: None,
            high_item: default_high_currency_item(),
            high_item_name: None,
            high_value: default_high_currency_value(),
            high_min_cost: default_high_currency_min_cost(),
        }
    }
}

impl CurrencySection {
    /// Whether the high currency is enabled.
    pub fn is_high_currency_enabled(&self) -> bool {
        !self.high_item.is_empty() && self.high_value > 0
    }

    fn currency_item(item_type: &str, name: Option<&String>) -> ItemStack {
        ItemStack::new(item_type, 1).with_meta(ItemMeta {
            display_name: name.cloned(),
            ..ItemMeta::default()
        })
    }

    /// Convert into the runtime currency settings.
    pub fn to_currency_config(&self) -> CurrencyConfig {
        let high = self.is_high_currency_enabled().then(|| HighCurrency {
            item: Self::currency_item(&self.high_item, self.high_item_name.as_ref()),
            value: self.high_value,
            min_cost: self.high_min_cost,
        });
        CurrencyConfig {
            item: Self::currency_item(&self.item, self.item_name.as_ref()),
            high,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Enable debug options.
    #[serde(default)]
    pub debug: bool,

    /// Named debug options, for example `empty-trades`.
    #[serde(default)]
    pub debug_options: Vec<String>,
}

impl LoggingConfig {
    /// Override the log level with `MERCHANT_LOG` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MERCHANT_LOG") {
            self.level = val;
        }
    }

    /// Whether debugging is on and the named option is enabled.
    pub fn debug_option(&self, name: &str) -> bool {
        self.debug && self.debug_options.iter().any(|o| o == name)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            debug: false,
            debug_options: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_true() -> bool {
    true
}

const fn default_synthetic_click_window_ms() -> u64 {
    250
}

fn default_currency_item() -> String {
    "emerald".to_owned()
}

fn default_high_currency_item() -> String {
    "emerald_block".to_owned()
}

const fn default_high_currency_value() -> u32 {
    9
}

const fn default_high_currency_min_cost() -> u32 {
    20
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_trading_defaults() {
        let config = MerchantConfig::default();
        assert_eq!(config.trading_config(), TradingConfig::default());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
trading:
  use_strict_item_comparison: true
  prevent_trading_with_own_shop: false
  prevent_trading_while_owner_online: true
  synthetic_click_window_ms: 100

tax:
  rate: 10
  round_up: true

currency:
  item: "gold_nugget"
  item_name: "Coin"
  high_item: ""

logging:
  level: "debug"
  debug: true
  debug_options:
    - empty-trades
"#;
        let config = MerchantConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();
        let trading = config.trading_config();

        assert_eq!(trading.comparison, ItemComparison::Strict);
        assert!(!trading.prevent_trading_with_own_shop);
        assert!(trading.prevent_trading_while_owner_online);
        assert_eq!(trading.synthetic_click_window, Duration::from_millis(100));
        assert_eq!(trading.tax.rate_percent, 10);
        assert!(trading.tax.round_up);
        assert_eq!(trading.currency.item.item_type, "gold_nugget");
        assert_eq!(
            trading.currency.item.meta.display_name.as_deref(),
            Some("Coin")
        );
        assert!(trading.currency.high.is_none());
        assert!(trading.debug_empty_trades);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = MerchantConfig::parse("tax:\n  rate: 5\n");
        let config = config.ok().unwrap_or_default();
        assert_eq!(config.tax.rate, 5);
        assert!(config.trading.prevent_trading_with_own_shop);
        assert_eq!(config.currency.high_value, 9);
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(MerchantConfig::parse("").is_ok());
    }

    #[test]
    fn debug_options_need_debug_enabled() {
        let logging = LoggingConfig {
            debug: false,
            debug_options: vec![DEBUG_EMPTY_TRADES.to_owned()],
            ..LoggingConfig::default()
        };
        assert!(!logging.debug_option(DEBUG_EMPTY_TRADES));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("merchant-config.yaml");
        if path.exists() {
            let config = MerchantConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
