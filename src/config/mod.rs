//! Gateway configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `PLAYDEX_` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use playdex_gateway::config::GatewayConfig;
//!
//! let config = GatewayConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod assistant;
mod classification;
mod context;
mod error;

pub use assistant::AssistantConfig;
pub use classification::{GateConfig, IntentConfig};
pub use context::ContextConfig;
pub use error::{ConfigError, ValidationError};

use serde::Deserialize;

/// Root gateway configuration
///
/// Contains all configuration sections for the conversational gateway.
/// Load using [`GatewayConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GatewayConfig {
    /// Remote assistant backend (endpoint, client key, timeout)
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Context summary settings
    #[serde(default)]
    pub context: ContextConfig,

    /// Domain gate tuning
    #[serde(default)]
    pub gate: GateConfig,

    /// Intent classifier tuning
    #[serde(default)]
    pub intent: IntentConfig,
}

impl GatewayConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PLAYDEX` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PLAYDEX__ASSISTANT__ENDPOINT=https://…` -> `assistant.endpoint`
    /// - `PLAYDEX__CONTEXT__CONTEXT_MESSAGE_COUNT=8` -> `context.context_message_count`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PLAYDEX")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.assistant.validate()?;
        self.context.validate()?;
        self.gate.validate()?;
        self.intent.validate()?;
        Ok(())
    }
}
