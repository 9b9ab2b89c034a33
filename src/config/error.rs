//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid assistant endpoint URL")]
    InvalidEndpoint,

    #[error("Confidence threshold must be within 0.0..=1.0")]
    ThresholdOutOfRange,

    #[error("Block delay range must satisfy min <= max")]
    InvalidDelayRange,

    #[error("Context message count must be non-zero")]
    ZeroContextMessageCount,

    #[error("Context character budget must be non-zero")]
    ZeroContextCharacterBudget,
}
