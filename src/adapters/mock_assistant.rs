//! Mock Assistant Backend for testing.
//!
//! Provides a configurable mock implementation of the AssistantBackend port,
//! allowing tests to run without a network.
//!
//! # Features
//!
//! - Pre-configured replies (consumed in order)
//! - Error injection for failure-path testing
//! - Call recording for verification
//!
//! # Example
//!
//! ```ignore
//! let backend = MockAssistantBackend::new()
//!     .with_reply("Welcome to Playdex!")
//!     .with_failure(MockFailure::BadStatus { status: 503, body: "down".into() });
//!
//! let reply = backend.ask(request).await?;
//! assert_eq!(reply, "Welcome to Playdex!");
//! assert_eq!(backend.ask_count(), 1);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{AskRequest, AssistantBackend, AssistantError, ResetRequest};

/// A recorded backend call.
#[derive(Debug, Clone)]
pub enum RecordedCall {
    Ask(AskRequest),
    Reset(ResetRequest),
}

/// A configured mock reply.
#[derive(Debug, Clone)]
enum MockReply {
    Success(String),
    Failure(MockFailure),
}

/// Mock failure types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockFailure {
    /// Simulate a malformed request.
    InvalidRequest { message: String },
    /// Simulate a non-2xx status.
    BadStatus { status: u16, body: String },
    /// Simulate an exhausted parse.
    EmptyResponse,
    /// Simulate an undecodable body.
    DecodingFailed { message: String },
    /// Simulate a transport failure.
    Network { message: String },
}

impl From<MockFailure> for AssistantError {
    fn from(failure: MockFailure) -> Self {
        match failure {
            MockFailure::InvalidRequest { message } => AssistantError::invalid_request(message),
            MockFailure::BadStatus { status, body } => AssistantError::bad_status(status, body),
            MockFailure::EmptyResponse => AssistantError::EmptyResponse,
            MockFailure::DecodingFailed { message } => AssistantError::decoding(message),
            MockFailure::Network { message } => AssistantError::network(message),
        }
    }
}

/// Mock assistant backend for testing.
///
/// Replies are consumed in order across both `ask` and `reset_state`; when
/// the queue runs dry a default success reply is returned.
#[derive(Debug, Clone, Default)]
pub struct MockAssistantBackend {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockAssistantBackend {
    /// Creates a new mock backend with an empty reply queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Success(reply.into()));
        self
    }

    /// Queues a failure.
    pub fn with_failure(self, failure: MockFailure) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Failure(failure));
        self
    }

    /// Returns all recorded calls in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the total number of backend calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns the number of `ask` calls.
    pub fn ask_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, RecordedCall::Ask(_)))
            .count()
    }

    /// Returns the number of `reset_state` calls.
    pub fn reset_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, RecordedCall::Reset(_)))
            .count()
    }

    /// Returns the content of every recorded `ask`, in order.
    pub fn ask_contents(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                RecordedCall::Ask(req) => Some(req.content.clone()),
                RecordedCall::Reset(_) => None,
            })
            .collect()
    }

    fn next_reply(&self) -> Result<String, AssistantError> {
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockReply::Success("Mock reply".to_string()));

        match reply {
            MockReply::Success(text) => Ok(text),
            MockReply::Failure(failure) => Err(failure.into()),
        }
    }
}

#[async_trait]
impl AssistantBackend for MockAssistantBackend {
    async fn ask(&self, request: AskRequest) -> Result<String, AssistantError> {
        self.calls.lock().unwrap().push(RecordedCall::Ask(request));
        self.next_reply()
    }

    async fn reset_state(&self, request: ResetRequest) -> Result<String, AssistantError> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall::Reset(request));
        self.next_reply()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Url;

    fn endpoint() -> Url {
        Url::parse("https://assistant.playdex.app").unwrap()
    }

    #[tokio::test]
    async fn replies_are_consumed_in_order() {
        let backend = MockAssistantBackend::new()
            .with_reply("first")
            .with_reply("second");

        let a = backend
            .ask(AskRequest::new(endpoint(), "k", "one"))
            .await
            .unwrap();
        let b = backend
            .ask(AskRequest::new(endpoint(), "k", "two"))
            .await
            .unwrap();

        assert_eq!(a, "first");
        assert_eq!(b, "second");
    }

    #[tokio::test]
    async fn drained_queue_falls_back_to_default() {
        let backend = MockAssistantBackend::new();
        let reply = backend
            .ask(AskRequest::new(endpoint(), "k", "hello"))
            .await
            .unwrap();

        assert_eq!(reply, "Mock reply");
    }

    #[tokio::test]
    async fn failures_surface_as_errors() {
        let backend = MockAssistantBackend::new().with_failure(MockFailure::BadStatus {
            status: 500,
            body: "boom".to_string(),
        });

        let result = backend.ask(AskRequest::new(endpoint(), "k", "hello")).await;

        assert!(matches!(
            result,
            Err(AssistantError::BadStatus { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn calls_are_recorded_by_kind() {
        let backend = MockAssistantBackend::new();

        backend
            .reset_state(ResetRequest::new(endpoint(), "k"))
            .await
            .unwrap();
        backend
            .ask(AskRequest::new(endpoint(), "k", "hello"))
            .await
            .unwrap();

        assert_eq!(backend.call_count(), 2);
        assert_eq!(backend.reset_count(), 1);
        assert_eq!(backend.ask_count(), 1);
        assert_eq!(backend.ask_contents(), vec!["hello".to_string()]);
    }
}
