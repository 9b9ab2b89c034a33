//! Settings Port - per-turn configuration snapshots.
//!
//! The orchestrator never reads ambient mutable state. Each turn it asks this
//! port for a snapshot, so a settings change mid-session affects the next
//! turn and nothing else.

use secrecy::Secret;

/// Snapshot of the externally-managed gateway settings, taken once per turn.
#[derive(Debug, Clone)]
pub struct AssistantSettings {
    /// Assistant service base URL, unvalidated. `None` when unset.
    pub endpoint: Option<String>,
    /// Client key for the remote conversation context. `None` when unset.
    pub client_key: Option<Secret<String>>,
    /// Whether a context summary accompanies the first post-switch prompt.
    pub include_local_context: bool,
    /// How many recent messages feed the summary.
    pub context_message_count: usize,
    /// Hard character budget for the rendered summary.
    pub max_context_characters: usize,
}

impl AssistantSettings {
    /// Creates settings with the stock context defaults.
    pub fn new(endpoint: Option<String>, client_key: Option<Secret<String>>) -> Self {
        Self {
            endpoint,
            client_key,
            include_local_context: true,
            context_message_count: 8,
            max_context_characters: 2500,
        }
    }

    /// Sets whether local context is summarized into prompts.
    pub fn with_local_context(mut self, include: bool) -> Self {
        self.include_local_context = include;
        self
    }

    /// Sets the summary message count.
    pub fn with_message_count(mut self, count: usize) -> Self {
        self.context_message_count = count;
        self
    }

    /// Sets the summary character budget.
    pub fn with_character_budget(mut self, budget: usize) -> Self {
        self.max_context_characters = budget;
        self
    }
}

/// Port supplying per-turn settings snapshots.
pub trait SettingsSource: Send + Sync {
    /// Returns the current settings. Called exactly once per turn.
    fn snapshot(&self) -> AssistantSettings;
}
