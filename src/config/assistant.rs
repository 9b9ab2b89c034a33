//! Remote assistant configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Remote assistant backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// Base URL of the assistant service (e.g. "https://assistant.playdex.app")
    pub endpoint: Option<String>,

    /// Client key identifying this installation's conversation context
    pub client_key: Option<Secret<String>>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl AssistantConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an endpoint is configured
    pub fn has_endpoint(&self) -> bool {
        self.endpoint.as_ref().is_some_and(|e| !e.is_empty())
    }

    /// Check if a client key is configured
    pub fn has_client_key(&self) -> bool {
        self.client_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Validate assistant configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_endpoint() {
            return Err(ValidationError::MissingRequired("ASSISTANT_ENDPOINT"));
        }
        if !self.has_client_key() {
            return Err(ValidationError::MissingRequired("ASSISTANT_CLIENT_KEY"));
        }

        let endpoint = self.endpoint.as_deref().unwrap_or_default();
        if reqwest::Url::parse(endpoint).is_err() {
            return Err(ValidationError::InvalidEndpoint);
        }

        Ok(())
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            client_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
