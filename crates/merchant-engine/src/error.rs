//! Error types for the replay binary.
//!
//! [`EngineError`] wraps every failure mode of loading a configuration,
//! loading a scenario, and replaying it.

use merchant_core::ConfigError;
use merchant_trading::StorageError;

/// Top-level error for the replay binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The scenario file could not be read.
    #[error("failed to read scenario file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The scenario is not valid YAML for a scenario.
    #[error("failed to parse scenario YAML: {source}")]
    ScenarioYaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The scenario is well-formed but unusable.
    #[error("invalid scenario: {message}")]
    Scenario {
        /// Description of the problem.
        message: String,
    },

    /// Setting up an in-memory collaborator failed.
    #[error("storage error: {source}")]
    Storage {
        /// The underlying storage error.
        #[from]
        source: StorageError,
    },

    /// The report could not be serialized.
    #[error("failed to serialize report: {source}")]
    Output {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

impl From<serde_yml::Error> for EngineError {
    fn from(source: serde_yml::Error) -> Self {
        Self::ScenarioYaml { source }
    }
}
