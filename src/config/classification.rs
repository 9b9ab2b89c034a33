//! Classifier tuning configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Domain gate tuning
#[derive(Debug, Clone, Deserialize)]
pub struct GateConfig {
    /// Minimum confidence for an in-domain verdict to admit a message
    #[serde(default = "default_gate_threshold")]
    pub confidence_threshold: f32,

    /// Lower bound of the simulated block delay, in milliseconds
    #[serde(default = "default_block_delay_min_ms")]
    pub block_delay_min_ms: u64,

    /// Upper bound of the simulated block delay, in milliseconds
    #[serde(default = "default_block_delay_max_ms")]
    pub block_delay_max_ms: u64,
}

impl GateConfig {
    /// Validate gate configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ValidationError::ThresholdOutOfRange);
        }
        if self.block_delay_min_ms > self.block_delay_max_ms {
            return Err(ValidationError::InvalidDelayRange);
        }
        Ok(())
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_gate_threshold(),
            block_delay_min_ms: default_block_delay_min_ms(),
            block_delay_max_ms: default_block_delay_max_ms(),
        }
    }
}

/// Intent classifier tuning
#[derive(Debug, Clone, Deserialize)]
pub struct IntentConfig {
    /// Minimum calibrated confidence to accept a predicted intent label
    #[serde(default = "default_intent_floor")]
    pub confidence_floor: f32,
}

impl IntentConfig {
    /// Validate intent configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.confidence_floor) {
            return Err(ValidationError::ThresholdOutOfRange);
        }
        Ok(())
    }
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            confidence_floor: default_intent_floor(),
        }
    }
}

fn default_gate_threshold() -> f32 {
    0.70
}

fn default_block_delay_min_ms() -> u64 {
    1000
}

fn default_block_delay_max_ms() -> u64 {
    2000
}

fn default_intent_floor() -> f32 {
    0.55
}
