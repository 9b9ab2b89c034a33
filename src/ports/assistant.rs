//! Assistant Backend Port - contract with the remote language-model service.
//!
//! The gateway talks to one remote assistant per installation. The port keeps
//! the orchestrator independent of the transport so tests can script
//! responses without a network.

use async_trait::async_trait;
use reqwest::Url;

/// A normalized `ask` request.
///
/// The endpoint and client key are resolved from the settings snapshot each
/// turn, so they travel with the request instead of living in the adapter.
#[derive(Debug, Clone)]
pub struct AskRequest {
    /// Base URL of the assistant service.
    pub endpoint: Url,
    /// Client key identifying the server-side conversation context.
    pub client_id: String,
    /// Prompt content. Sanitized for transport by the adapter.
    pub content: String,
}

impl AskRequest {
    /// Creates a new ask request.
    pub fn new(endpoint: Url, client_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            endpoint,
            client_id: client_id.into(),
            content: content.into(),
        }
    }
}

/// A context-reset request.
#[derive(Debug, Clone)]
pub struct ResetRequest {
    /// Base URL of the assistant service.
    pub endpoint: Url,
    /// Client key whose server-side context is dropped.
    pub client_id: String,
}

impl ResetRequest {
    /// Creates a new reset request.
    pub fn new(endpoint: Url, client_id: impl Into<String>) -> Self {
        Self {
            endpoint,
            client_id: client_id.into(),
        }
    }
}

/// Port for the remote assistant backend.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Sends a prompt and returns the normalized reply text.
    async fn ask(&self, request: AskRequest) -> Result<String, AssistantError>;

    /// Drops the server-side conversation context for the client key.
    ///
    /// Idempotent from the caller's perspective: safe to call when no prior
    /// context exists. The returned acknowledgement text is informational.
    async fn reset_state(&self, request: ResetRequest) -> Result<String, AssistantError>;
}

/// Assistant backend errors.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// The request could not be constructed (bad URL join, bad query).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Non-2xx HTTP status. Parsing is skipped entirely.
    #[error("assistant returned status {status}: {body}")]
    BadStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body text.
        body: String,
    },

    /// Every parse rule was exhausted without a non-empty string.
    #[error("assistant returned an empty response")]
    EmptyResponse,

    /// The response body was structurally undecodable.
    #[error("failed to decode assistant response: {0}")]
    DecodingFailed(String),

    /// Transport-level failure (connect, timeout, I/O).
    #[error("network error: {0}")]
    Network(String),
}

impl AssistantError {
    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Creates a bad status error.
    pub fn bad_status(status: u16, body: impl Into<String>) -> Self {
        Self::BadStatus {
            status,
            body: body.into(),
        }
    }

    /// Creates a decoding error.
    pub fn decoding(message: impl Into<String>) -> Self {
        Self::DecodingFailed(message.into())
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }
}
