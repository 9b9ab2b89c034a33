//! Static settings source.
//!
//! Serves a fixed settings snapshot, optionally swapped at runtime. The
//! mobile shell wires its own persistent settings screen behind the same
//! port; this adapter covers embedding and tests.

use secrecy::Secret;
use std::sync::Mutex;

use crate::config::GatewayConfig;
use crate::ports::{AssistantSettings, SettingsSource};

/// SettingsSource serving a fixed (but replaceable) snapshot.
#[derive(Debug)]
pub struct StaticSettings {
    settings: Mutex<AssistantSettings>,
}

impl StaticSettings {
    /// Creates a source around the given settings.
    pub fn new(settings: AssistantSettings) -> Self {
        Self {
            settings: Mutex::new(settings),
        }
    }

    /// Builds settings from loaded gateway configuration.
    pub fn from_config(config: &GatewayConfig) -> Self {
        let settings = AssistantSettings {
            endpoint: config.assistant.endpoint.clone(),
            client_key: config.assistant.client_key.clone(),
            include_local_context: config.context.include_local_context,
            context_message_count: config.context.context_message_count,
            max_context_characters: config.context.max_context_characters,
        };
        Self::new(settings)
    }

    /// Replaces the served snapshot. Takes effect on the next turn.
    pub fn update(&self, settings: AssistantSettings) {
        *self.settings.lock().unwrap() = settings;
    }
}

impl SettingsSource for StaticSettings {
    fn snapshot(&self) -> AssistantSettings {
        self.settings.lock().unwrap().clone()
    }
}

/// Convenience constructor for fully-configured test settings.
pub fn test_settings(endpoint: &str, client_key: &str) -> AssistantSettings {
    AssistantSettings::new(
        Some(endpoint.to_string()),
        Some(Secret::new(client_key.to_string())),
    )
}
