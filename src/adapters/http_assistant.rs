//! Remote Assistant Client - HTTP implementation of the AssistantBackend port.
//!
//! Speaks the assistant service's two-endpoint contract:
//!
//! - `GET /api/v1/question?content=…&client_id=…` to ask
//! - `DELETE /api/v1/reset-state` with `{"client_id": …}` to drop context
//!
//! Responses arrive in several shapes (bare JSON string, an envelope object,
//! plain text); [`normalize_reply`] folds them into one display string. No
//! retries happen here: every failure is terminal for the turn.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::domain::prompt::truncate_chars;
use crate::ports::{AskRequest, AssistantBackend, AssistantError, ResetRequest};

/// Hard cap on outbound `content`, in characters. The ask endpoint carries
/// content in the query string, so it is tighter than the context-summary
/// budget feeding into it.
pub const MAX_CONTENT_CHARS: usize = 1200;

const QUESTION_PATH: &str = "/api/v1/question";
const RESET_PATH: &str = "/api/v1/reset-state";

/// HTTP client for the remote assistant backend.
pub struct RemoteAssistantClient {
    client: Client,
}

impl RemoteAssistantClient {
    /// Creates a client with the given request timeout.
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Reads the response, enforcing the status short-circuit and the parse
    /// precedence.
    async fn read_reply(&self, response: reqwest::Response) -> Result<String, AssistantError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::bad_status(status.as_u16(), body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AssistantError::network(e.to_string()))?;
        let body = String::from_utf8(bytes.to_vec())
            .map_err(|e| AssistantError::decoding(e.to_string()))?;

        normalize_reply(&body)
    }

    fn map_send_error(e: reqwest::Error) -> AssistantError {
        if e.is_timeout() {
            AssistantError::network(format!("Request timed out: {}", e))
        } else if e.is_connect() {
            AssistantError::network(format!("Connection failed: {}", e))
        } else {
            AssistantError::network(e.to_string())
        }
    }
}

impl Default for RemoteAssistantClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl AssistantBackend for RemoteAssistantClient {
    async fn ask(&self, request: AskRequest) -> Result<String, AssistantError> {
        let url = join_path(&request.endpoint, QUESTION_PATH)?;
        let content = sanitize_content(&request.content);
        debug!(chars = content.chars().count(), "sending ask request");

        let response = self
            .client
            .get(url)
            .query(&[
                ("content", content.as_str()),
                ("client_id", request.client_id.as_str()),
            ])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(Self::map_send_error)?;

        self.read_reply(response).await
    }

    async fn reset_state(&self, request: ResetRequest) -> Result<String, AssistantError> {
        let url = join_path(&request.endpoint, RESET_PATH)?;
        debug!(client_id = %request.client_id, "resetting server context");

        let response = self
            .client
            .delete(url)
            .header("Accept", "application/json")
            .json(&ResetBody {
                client_id: &request.client_id,
            })
            .send()
            .await
            .map_err(Self::map_send_error)?;

        self.read_reply(response).await
    }
}

/// Appends an API path to the configured endpoint.
fn join_path(endpoint: &Url, path: &str) -> Result<Url, AssistantError> {
    let base = endpoint.as_str().trim_end_matches('/');
    Url::parse(&format!("{base}{path}"))
        .map_err(|e| AssistantError::invalid_request(e.to_string()))
}

/// Sanitizes outbound content for the query-string transport: whitespace runs
/// collapse to single spaces, the result is trimmed and prefix-capped at
/// [`MAX_CONTENT_CHARS`].
pub fn sanitize_content(content: &str) -> String {
    let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&collapsed, MAX_CONTENT_CHARS)
}

/// Folds a response body into a single display string.
///
/// Rules are tried in order; the first non-empty trimmed string wins:
/// 1. bare JSON string
/// 2. envelope object `content` field
/// 3. envelope object `action.speak` field
/// 4. raw body text (non-JSON bodies only)
///
/// A JSON object whose fields are all empty yields [`AssistantError::EmptyResponse`],
/// as does an all-whitespace body.
pub fn normalize_reply(body: &str) -> Result<String, AssistantError> {
    if let Ok(bare) = serde_json::from_str::<String>(body) {
        let trimmed = bare.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
        return Err(AssistantError::EmptyResponse);
    }

    if let Ok(envelope) = serde_json::from_str::<AssistantEnvelope>(body) {
        if let Some(content) = non_empty(envelope.content.as_deref()) {
            return Ok(content);
        }
        let speak = envelope.action.and_then(|a| a.speak);
        if let Some(speak) = non_empty(speak.as_deref()) {
            return Ok(speak);
        }
        return Err(AssistantError::EmptyResponse);
    }

    non_empty(Some(body)).ok_or(AssistantError::EmptyResponse)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ----- Wire Types -----

#[derive(Debug, Serialize)]
struct ResetBody<'a> {
    client_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct AssistantEnvelope {
    content: Option<String>,
    action: Option<EnvelopeAction>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeAction {
    speak: Option<String>,
}
