//! Replay binary for the merchant exchange engine.
//!
//! Loads the engine configuration and a trade scenario, replays every
//! gesture through the engine with in-memory collaborators, and prints the
//! produced events and ledger statistics as JSON on stdout.
//!
//! # Usage
//!
//! ```text
//! merchant-engine [SCENARIO]
//! ```
//!
//! `SCENARIO` defaults to `scenarios/selling-batch.yaml`. The configuration
//! is read from `merchant-config.yaml` (or the path in `MERCHANT_CONFIG`)
//! when present.
//!
//! # Startup Sequence
//!
//! 1. Load configuration
//! 2. Initialize structured logging (tracing)
//! 3. Load the scenario
//! 4. Replay it and print the report

mod error;
mod scenario;

use std::path::PathBuf;

use merchant_core::MerchantConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::scenario::{Scenario, replay};

/// Scenario replayed when no path is given.
const DEFAULT_SCENARIO: &str = "scenarios/selling-batch.yaml";

/// Configuration file read when `MERCHANT_CONFIG` is unset.
const DEFAULT_CONFIG: &str = "merchant-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration or scenario cannot be loaded, or
/// the report cannot be written.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging on stderr; stdout carries the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(
        tax_rate = config.tax.rate,
        currency = config.currency.item,
        strict = config.trading.use_strict_item_comparison,
        "Configuration loaded"
    );

    // 3. Load the scenario.
    let path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_SCENARIO), PathBuf::from);
    let scenario = Scenario::from_file(&path)?;
    info!(scenario = scenario.name, gestures = scenario.gestures.len(), "Scenario loaded");

    // 4. Replay and report.
    let report = replay(scenario, config.trading_config())?;
    info!(
        committed = report.ledger.committed_trades,
        events = report.events.len(),
        "Replay complete"
    );
    println!("{}", serde_json::to_string_pretty(&report).map_err(EngineError::from)?);
    Ok(())
}

/// Load the configuration file, falling back to defaults when absent.
fn load_config() -> Result<MerchantConfig, EngineError> {
    let path = std::env::var_os("MERCHANT_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);
    if path.exists() {
        Ok(MerchantConfig::from_file(&path)?)
    } else {
        let mut config = MerchantConfig::default();
        config.logging.apply_env_overrides();
        Ok(config)
    }
}
