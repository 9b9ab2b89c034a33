//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http_assistant` - reqwest client for the remote assistant service
//! - `in_memory_store` - message persistence for tests and previews
//! - `static_settings` - fixed settings snapshots
//! - `mock_assistant` / `mock_classifier` - scripted test doubles

mod http_assistant;
mod in_memory_store;
mod mock_assistant;
mod mock_classifier;
mod static_settings;

pub use http_assistant::{
    normalize_reply, sanitize_content, RemoteAssistantClient, MAX_CONTENT_CHARS,
};
pub use in_memory_store::InMemoryMessageStore;
pub use mock_assistant::{MockAssistantBackend, MockFailure, RecordedCall};
pub use mock_classifier::{ScriptedClassifier, StaticClassifier};
pub use static_settings::{test_settings, StaticSettings};
