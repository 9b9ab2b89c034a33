//! Local conversation context configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Settings governing the context summary attached to the first prompt
/// after a room switch.
#[derive(Debug, Clone, Deserialize)]
pub struct ContextConfig {
    /// Whether recent local messages are summarized into the prompt
    #[serde(default = "default_include_local_context")]
    pub include_local_context: bool,

    /// How many recent messages feed the summary
    #[serde(default = "default_context_message_count")]
    pub context_message_count: usize,

    /// Hard character budget for the rendered summary
    #[serde(default = "default_max_context_characters")]
    pub max_context_characters: usize,
}

impl ContextConfig {
    /// Validate context configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.context_message_count == 0 {
            return Err(ValidationError::ZeroContextMessageCount);
        }
        if self.max_context_characters == 0 {
            return Err(ValidationError::ZeroContextCharacterBudget);
        }
        Ok(())
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            include_local_context: default_include_local_context(),
            context_message_count: default_context_message_count(),
            max_context_characters: default_max_context_characters(),
        }
    }
}

fn default_include_local_context() -> bool {
    true
}

fn default_context_message_count() -> usize {
    8
}

fn default_max_context_characters() -> usize {
    2500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_config_defaults() {
        let config = ContextConfig::default();
        assert!(config.include_local_context);
        assert_eq!(config.context_message_count, 8);
        assert_eq!(config.max_context_characters, 2500);
    }

    #[test]
    fn test_validation_rejects_zero_count() {
        let config = ContextConfig {
            context_message_count: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_budget() {
        let config = ContextConfig {
            max_context_characters: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(ContextConfig::default().validate().is_ok());
    }
}
