//! ConversationOrchestrator - the per-room turn state machine.
//!
//! Sequences one user turn end to end: gate, server-context sync, intent
//! classification, prompt assembly, the remote ask, and persistence. Exactly
//! one turn may be in flight per orchestrator; the in-flight flag is checked
//! at entry and cleared on every exit path.

use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::domain::chat::{Message, Room, ServerContext};
use crate::domain::gate::{DomainGate, GateDecision};
use crate::domain::intent::IntentResolver;
use crate::domain::prompt;
use crate::ports::{
    AskRequest, AssistantBackend, AssistantError, AssistantSettings, MessageStore,
    MessageStoreError, ResetRequest, SettingsSource,
};

/// How a completed turn ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The remote assistant replied.
    Replied(Message),
    /// The gate refused the message; the reply was synthesized locally.
    Blocked(Message),
}

impl TurnOutcome {
    /// The assistant message appended by this turn.
    pub fn message(&self) -> &Message {
        match self {
            TurnOutcome::Replied(m) | TurnOutcome::Blocked(m) => m,
        }
    }
}

/// Turn-fatal configuration problems, resolved fresh each turn.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigurationError {
    #[error("assistant endpoint is not configured")]
    MissingEndpoint,

    #[error("assistant client key is not configured")]
    MissingClientKey,

    #[error("assistant endpoint is not a valid URL: {0}")]
    InvalidEndpoint(String),
}

/// Errors a send can fail with.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// A turn is already in flight for this orchestrator.
    #[error("a message is already being sent")]
    TurnInFlight,

    /// The message was empty after trimming.
    #[error("message is empty")]
    EmptyMessage,

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Assistant(#[from] AssistantError),

    #[error(transparent)]
    Store(#[from] MessageStoreError),
}

impl SendError {
    /// Whether the error populates the user-visible error field.
    /// Precondition rejections are caller signals, not turn failures.
    fn is_user_visible(&self) -> bool {
        !matches!(self, SendError::TurnInFlight | SendError::EmptyMessage)
    }
}

/// Endpoint and client key resolved from one settings snapshot.
struct TurnConfig {
    endpoint: reqwest::Url,
    client_id: String,
}

impl TurnConfig {
    fn resolve(settings: &AssistantSettings) -> Result<Self, ConfigurationError> {
        use secrecy::ExposeSecret;

        let endpoint_raw = settings
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(ConfigurationError::MissingEndpoint)?;

        let client_id = settings
            .client_key
            .as_ref()
            .map(|k| k.expose_secret().clone())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigurationError::MissingClientKey)?;

        let endpoint = reqwest::Url::parse(endpoint_raw)
            .map_err(|e| ConfigurationError::InvalidEndpoint(e.to_string()))?;

        Ok(Self {
            endpoint,
            client_id,
        })
    }
}

/// Per-room conversation orchestrator.
///
/// One instance lives per room view. It owns the server-context state
/// machine, a local mirror of the room's messages, and the single
/// user-visible error field.
pub struct ConversationOrchestrator {
    room: Room,
    gate: DomainGate,
    intents: IntentResolver,
    backend: Arc<dyn AssistantBackend>,
    store: Arc<dyn MessageStore>,
    settings: Arc<dyn SettingsSource>,
    server_context: ServerContext,
    messages: Vec<Message>,
    is_sending: bool,
    error_message: Option<String>,
}

impl ConversationOrchestrator {
    /// Creates an orchestrator bound to `room`. Call [`load_history`]
    /// (or [`switch_room`]) before the first send so the local mirror
    /// reflects persisted history.
    ///
    /// [`load_history`]: Self::load_history
    /// [`switch_room`]: Self::switch_room
    pub fn new(
        room: Room,
        gate: DomainGate,
        intents: IntentResolver,
        backend: Arc<dyn AssistantBackend>,
        store: Arc<dyn MessageStore>,
        settings: Arc<dyn SettingsSource>,
    ) -> Self {
        Self {
            room,
            gate,
            intents,
            backend,
            store,
            settings,
            server_context: ServerContext::new(),
            messages: Vec::new(),
            is_sending: false,
            error_message: None,
        }
    }

    /// Refreshes the local message mirror from the store.
    pub async fn load_history(&mut self) -> Result<(), SendError> {
        self.messages = self.store.load_messages(self.room.id).await?;
        Ok(())
    }

    /// Rebinds the orchestrator to another room: invalidates the tracked
    /// server context and reloads the message mirror.
    pub async fn switch_room(&mut self, room: Room) -> Result<(), SendError> {
        if room.id != self.room.id {
            self.server_context.invalidate();
        }
        self.room = room;
        self.error_message = None;
        self.load_history().await
    }

    /// The room this orchestrator is bound to.
    pub fn room(&self) -> &Room {
        &self.room
    }

    /// Local mirror of the room's messages.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether a turn is currently in flight.
    pub fn is_sending(&self) -> bool {
        self.is_sending
    }

    /// The user-visible error from the last failed turn, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Runs one user turn.
    ///
    /// Gate blocks are successful turns carrying a synthesized reply. Remote
    /// and configuration failures abort the turn after the user's own message
    /// is persisted; no assistant message is appended and the error lands in
    /// [`error_message`](Self::error_message).
    pub async fn send_message(&mut self, text: &str) -> Result<TurnOutcome, SendError> {
        if self.is_sending {
            return Err(SendError::TurnInFlight);
        }
        let trimmed = text.trim().to_string();
        if trimmed.is_empty() {
            return Err(SendError::EmptyMessage);
        }

        self.is_sending = true;
        self.error_message = None;

        let result = self.run_turn(trimmed).await;
        self.is_sending = false;

        if let Err(err) = &result {
            warn!(room = %self.room.id, error = %err, "turn failed");
            if err.is_user_visible() {
                self.error_message = Some(err.to_string());
            }
        }

        result
    }

    async fn run_turn(&mut self, text: String) -> Result<TurnOutcome, SendError> {
        info!(room = %self.room.id, "turn started");

        // Snapshot history before the user message lands; the context summary
        // must describe the conversation as it stood at send time.
        let history_snapshot = self.messages.clone();

        self.persist(Message::user(text.as_str())).await?;

        if let GateDecision::Block {
            reason,
            reply_text,
            delay,
        } = self.gate.evaluate(&text)
        {
            debug!(room = %self.room.id, ?reason, "gate refused message");
            sleep(delay).await;
            let reply = Message::assistant(reply_text);
            self.persist(reply.clone()).await?;
            return Ok(TurnOutcome::Blocked(reply));
        }

        let settings = self.settings.snapshot();
        let turn_config = TurnConfig::resolve(&settings)?;

        if self.server_context.needs_sync(self.room.id) {
            info!(room = %self.room.id, "synchronizing server context");
            self.backend
                .reset_state(ResetRequest::new(
                    turn_config.endpoint.clone(),
                    turn_config.client_id.as_str(),
                ))
                .await?;
            // The injection reply is the model acknowledging its instructions;
            // it must never reach the user.
            self.backend
                .ask(AskRequest::new(
                    turn_config.endpoint.clone(),
                    turn_config.client_id.as_str(),
                    prompt::system_prompt(),
                ))
                .await?;
            self.server_context.mark_synced(self.room.id);
        }

        let intent = self.intents.resolve(&text);

        let summary = if settings.include_local_context
            && self.server_context.first_message_pending()
            && !history_snapshot.is_empty()
        {
            prompt::summarize_context(
                &history_snapshot,
                settings.context_message_count,
                settings.max_context_characters,
            )
        } else {
            None
        };

        let payload = prompt::user_payload(intent, &text, summary.as_deref());
        debug!(
            room = %self.room.id,
            intent = %intent,
            with_summary = summary.is_some(),
            "sending payload"
        );

        let raw = self
            .backend
            .ask(AskRequest::new(
                turn_config.endpoint,
                turn_config.client_id,
                payload,
            ))
            .await?;

        let reply = Message::assistant(strip_wrapping_quotes(raw.trim()).trim());
        self.persist(reply.clone()).await?;
        self.server_context.mark_first_message_sent();

        info!(room = %self.room.id, "turn completed");
        Ok(TurnOutcome::Replied(reply))
    }

    /// Appends to the store, touches the room, and mirrors locally.
    async fn persist(&mut self, message: Message) -> Result<(), SendError> {
        self.store.append_message(self.room.id, message.clone()).await?;
        self.store.touch_room(self.room.id).await?;
        self.room.touch();
        self.messages.push(message);
        Ok(())
    }
}

/// Strips exactly one layer of wrapping quotes when both ends form a
/// matching pair and the inner text is non-empty.
fn strip_wrapping_quotes(text: &str) -> &str {
    const PAIRS: [(char, char); 5] = [
        ('"', '"'),
        ('\'', '\''),
        ('`', '`'),
        ('\u{201C}', '\u{201D}'),
        ('\u{2018}', '\u{2019}'),
    ];

    let mut chars = text.chars();
    let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
        return text;
    };

    if PAIRS.iter().any(|&(open, close)| first == open && last == close) {
        let inner = &text[first.len_utf8()..text.len() - last.len_utf8()];
        if !inner.is_empty() {
            return inner;
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{
        test_settings, InMemoryMessageStore, MockAssistantBackend, MockFailure, StaticClassifier,
        StaticSettings,
    };
    use crate::config::{GateConfig, IntentConfig};
    use crate::domain::chat::MessageAuthor;

    const ENDPOINT: &str = "https://assistant.playdex.app";

    struct Fixture {
        backend: MockAssistantBackend,
        store: Arc<InMemoryMessageStore>,
        orchestrator: ConversationOrchestrator,
    }

    /// Gate config with a zero block delay so tests stay fast.
    fn fast_gate_config() -> GateConfig {
        GateConfig {
            block_delay_min_ms: 0,
            block_delay_max_ms: 0,
            ..Default::default()
        }
    }

    async fn fixture_with(
        domain_prediction: StaticClassifier,
        intent_prediction: StaticClassifier,
        backend: MockAssistantBackend,
        settings: AssistantSettings,
    ) -> Fixture {
        let store = Arc::new(InMemoryMessageStore::new());
        let room = Room::new("Test room");
        store.insert_room(room.clone()).await;

        let orchestrator = ConversationOrchestrator::new(
            room,
            DomainGate::new(Arc::new(domain_prediction), fast_gate_config()),
            IntentResolver::new(Arc::new(intent_prediction), IntentConfig::default()),
            Arc::new(backend.clone()),
            store.clone(),
            Arc::new(StaticSettings::new(settings)),
        );

        Fixture {
            backend,
            store,
            orchestrator,
        }
    }

    /// Fixture admitting every message, intent unavailable (defaults to info).
    async fn allowing_fixture(backend: MockAssistantBackend) -> Fixture {
        fixture_with(
            StaticClassifier::predicting("game", 0.95),
            StaticClassifier::unavailable(),
            backend,
            test_settings(ENDPOINT, "pdx-1"),
        )
        .await
    }

    #[tokio::test]
    async fn empty_message_is_rejected_without_side_effects() {
        let mut f = allowing_fixture(MockAssistantBackend::new()).await;

        let result = f.orchestrator.send_message("   ").await;

        assert!(matches!(result, Err(SendError::EmptyMessage)));
        assert!(f.orchestrator.messages().is_empty());
        assert_eq!(f.backend.call_count(), 0);
        assert!(f.orchestrator.error_message().is_none());
    }

    #[tokio::test]
    async fn in_flight_turn_is_rejected() {
        let mut f = allowing_fixture(MockAssistantBackend::new()).await;
        f.orchestrator.is_sending = true;

        let result = f.orchestrator.send_message("hello").await;

        assert!(matches!(result, Err(SendError::TurnInFlight)));
        assert_eq!(f.backend.call_count(), 0);
    }

    #[tokio::test]
    async fn blocked_message_never_reaches_the_backend() {
        let mut f = fixture_with(
            StaticClassifier::predicting("non_game", 0.99),
            StaticClassifier::unavailable(),
            MockAssistantBackend::new(),
            test_settings(ENDPOINT, "pdx-1"),
        )
        .await;

        let outcome = f.orchestrator.send_message("what about the stock market?").await.unwrap();

        assert!(matches!(outcome, TurnOutcome::Blocked(_)));
        assert_eq!(f.backend.call_count(), 0);

        // User message and canned reply are both persisted.
        let stored = f.store.load_messages(f.orchestrator.room().id).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].author, MessageAuthor::User);
        assert_eq!(stored[1].author, MessageAuthor::Assistant);
        assert_eq!(stored[1].text, crate::domain::gate::REFUSAL_REPLY);
    }

    #[tokio::test]
    async fn low_gate_confidence_blocks() {
        let mut f = fixture_with(
            StaticClassifier::predicting("game", 0.5),
            StaticClassifier::unavailable(),
            MockAssistantBackend::new(),
            test_settings(ENDPOINT, "pdx-1"),
        )
        .await;

        let outcome = f.orchestrator.send_message("uh").await.unwrap();

        assert!(matches!(outcome, TurnOutcome::Blocked(_)));
        assert_eq!(f.backend.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_endpoint_fails_before_any_remote_call() {
        let mut f = fixture_with(
            StaticClassifier::predicting("game", 0.95),
            StaticClassifier::unavailable(),
            MockAssistantBackend::new(),
            AssistantSettings::new(None, Some(secrecy::Secret::new("pdx-1".to_string()))),
        )
        .await;

        let result = f.orchestrator.send_message("best indie games?").await;

        assert!(matches!(
            result,
            Err(SendError::Configuration(ConfigurationError::MissingEndpoint))
        ));
        assert_eq!(f.backend.call_count(), 0);
        assert!(f.orchestrator.error_message().is_some());

        // User message persisted, no assistant message.
        let stored = f.store.load_messages(f.orchestrator.room().id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].author, MessageAuthor::User);
    }

    #[tokio::test]
    async fn unparseable_endpoint_fails_the_turn() {
        let mut f = fixture_with(
            StaticClassifier::predicting("game", 0.95),
            StaticClassifier::unavailable(),
            MockAssistantBackend::new(),
            test_settings("not a url", "pdx-1"),
        )
        .await;

        let result = f.orchestrator.send_message("best indie games?").await;

        assert!(matches!(
            result,
            Err(SendError::Configuration(ConfigurationError::InvalidEndpoint(_)))
        ));
        assert_eq!(f.backend.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_client_key_fails_the_turn() {
        let mut f = fixture_with(
            StaticClassifier::predicting("game", 0.95),
            StaticClassifier::unavailable(),
            MockAssistantBackend::new(),
            AssistantSettings::new(Some(ENDPOINT.to_string()), None),
        )
        .await;

        let result = f.orchestrator.send_message("best indie games?").await;

        assert!(matches!(
            result,
            Err(SendError::Configuration(ConfigurationError::MissingClientKey))
        ));
    }

    #[tokio::test]
    async fn context_sync_runs_once_per_room() {
        let backend = MockAssistantBackend::new()
            .with_reply("ack reset")
            .with_reply("system prompt ack")
            .with_reply("first answer")
            .with_reply("second answer");
        let mut f = allowing_fixture(backend).await;

        f.orchestrator.send_message("what is Hades?").await.unwrap();
        f.orchestrator.send_message("and Hades II?").await.unwrap();

        // One reset + one system injection total, then one ask per turn.
        assert_eq!(f.backend.reset_count(), 1);
        assert_eq!(f.backend.ask_count(), 3);
    }

    #[tokio::test]
    async fn system_prompt_reply_is_never_shown() {
        let backend = MockAssistantBackend::new()
            .with_reply("ack reset")
            .with_reply("SYSTEM ACK - DO NOT DISPLAY")
            .with_reply("visible answer");
        let mut f = allowing_fixture(backend).await;

        let outcome = f.orchestrator.send_message("what is Celeste?").await.unwrap();

        assert_eq!(outcome.message().text, "visible answer");
        assert!(f
            .orchestrator
            .messages()
            .iter()
            .all(|m| !m.text.contains("DO NOT DISPLAY")));
    }

    #[tokio::test]
    async fn first_message_in_fresh_room_has_no_summary() {
        let backend = MockAssistantBackend::new()
            .with_reply("ack")
            .with_reply("ack")
            .with_reply("answer");
        let mut f = allowing_fixture(backend).await;

        f.orchestrator.send_message("What is X?").await.unwrap();

        let contents = f.backend.ask_contents();
        // Payload is the last ask (after the system injection).
        let payload = contents.last().unwrap();
        assert!(payload.starts_with("[Intent]\ninfo"));
        assert!(!payload.contains("[Context Summary]"));
        assert!(payload.contains("[User]\nWhat is X?"));
    }

    #[tokio::test]
    async fn first_message_after_resync_carries_summary() {
        let backend = MockAssistantBackend::new();
        let mut f = allowing_fixture(backend).await;

        // Seed persisted history, then reload the mirror.
        let room_id = f.orchestrator.room().id;
        f.store
            .append_message(room_id, Message::user("I loved Celeste"))
            .await
            .unwrap();
        f.store
            .append_message(room_id, Message::assistant("Noted!"))
            .await
            .unwrap();
        f.orchestrator.load_history().await.unwrap();

        f.orchestrator.send_message("something similar?").await.unwrap();

        let payload = f.backend.ask_contents().last().unwrap().clone();
        assert!(payload.contains("[Context Summary]"));
        assert!(payload.contains("User: I loved Celeste"));
        assert!(payload.contains("Assistant: Noted!"));
    }

    #[tokio::test]
    async fn second_message_has_no_summary() {
        let backend = MockAssistantBackend::new();
        let mut f = allowing_fixture(backend).await;

        let room_id = f.orchestrator.room().id;
        f.store
            .append_message(room_id, Message::user("earlier"))
            .await
            .unwrap();
        f.orchestrator.load_history().await.unwrap();

        f.orchestrator.send_message("first").await.unwrap();
        f.orchestrator.send_message("second").await.unwrap();

        let contents = f.backend.ask_contents();
        let last_payload = contents.last().unwrap();
        assert!(last_payload.contains("[User]\nsecond"));
        assert!(!last_payload.contains("[Context Summary]"));
    }

    #[tokio::test]
    async fn summary_respects_local_context_setting() {
        let backend = MockAssistantBackend::new();
        let mut f = fixture_with(
            StaticClassifier::predicting("game", 0.95),
            StaticClassifier::unavailable(),
            backend,
            test_settings(ENDPOINT, "pdx-1").with_local_context(false),
        )
        .await;

        let room_id = f.orchestrator.room().id;
        f.store
            .append_message(room_id, Message::user("earlier"))
            .await
            .unwrap();
        f.orchestrator.load_history().await.unwrap();

        f.orchestrator.send_message("first").await.unwrap();

        let payload = f.backend.ask_contents().last().unwrap().clone();
        assert!(!payload.contains("[Context Summary]"));
    }

    #[tokio::test]
    async fn intent_label_flows_into_payload() {
        let backend = MockAssistantBackend::new();
        let mut f = fixture_with(
            StaticClassifier::predicting("game", 0.95),
            StaticClassifier::predicting("recommend", 0.9),
            backend,
            test_settings(ENDPOINT, "pdx-1"),
        )
        .await;

        f.orchestrator.send_message("games like Hades?").await.unwrap();

        let payload = f.backend.ask_contents().last().unwrap().clone();
        assert!(payload.starts_with("[Intent]\nrecommend"));
    }

    #[tokio::test]
    async fn remote_failure_leaves_only_user_message() {
        let backend = MockAssistantBackend::new()
            .with_reply("ack")
            .with_reply("ack")
            .with_failure(MockFailure::BadStatus {
                status: 502,
                body: "bad gateway".to_string(),
            });
        let mut f = allowing_fixture(backend).await;

        let result = f.orchestrator.send_message("what is Tunic?").await;

        assert!(matches!(result, Err(SendError::Assistant(_))));
        assert!(f.orchestrator.error_message().unwrap().contains("502"));
        assert!(!f.orchestrator.is_sending());

        let stored = f.store.load_messages(f.orchestrator.room().id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].author, MessageAuthor::User);
    }

    #[tokio::test]
    async fn failed_sync_keeps_context_stale_for_retry() {
        let backend = MockAssistantBackend::new()
            .with_failure(MockFailure::Network {
                message: "offline".to_string(),
            })
            .with_reply("ack")
            .with_reply("ack")
            .with_reply("answer");
        let mut f = allowing_fixture(backend).await;

        // First turn dies at the reset call.
        let result = f.orchestrator.send_message("hello games").await;
        assert!(matches!(result, Err(SendError::Assistant(_))));
        assert_eq!(f.backend.reset_count(), 1);

        // Next turn retries the full sync.
        f.orchestrator.send_message("hello again").await.unwrap();
        assert_eq!(f.backend.reset_count(), 2);
    }

    #[tokio::test]
    async fn reply_is_unquoted_once() {
        let backend = MockAssistantBackend::new()
            .with_reply("ack")
            .with_reply("ack")
            .with_reply("\"hello\"");
        let mut f = allowing_fixture(backend).await;

        let outcome = f.orchestrator.send_message("say hello").await.unwrap();

        assert_eq!(outcome.message().text, "hello");
    }

    #[tokio::test]
    async fn error_clears_on_next_successful_turn() {
        let backend = MockAssistantBackend::new()
            .with_failure(MockFailure::Network {
                message: "offline".to_string(),
            })
            .with_reply("ack")
            .with_reply("ack")
            .with_reply("answer");
        let mut f = allowing_fixture(backend).await;

        let _ = f.orchestrator.send_message("first try").await;
        assert!(f.orchestrator.error_message().is_some());

        f.orchestrator.send_message("second try").await.unwrap();
        assert!(f.orchestrator.error_message().is_none());
    }

    #[tokio::test]
    async fn switch_room_forces_resync_and_reloads_history() {
        let backend = MockAssistantBackend::new();
        let mut f = allowing_fixture(backend).await;

        f.orchestrator.send_message("in room one").await.unwrap();
        assert_eq!(f.backend.reset_count(), 1);

        let other = Room::new("Other room");
        f.store.insert_room(other.clone()).await;
        f.orchestrator.switch_room(other).await.unwrap();
        assert!(f.orchestrator.messages().is_empty());

        f.orchestrator.send_message("in room two").await.unwrap();
        assert_eq!(f.backend.reset_count(), 2);
    }

    #[tokio::test]
    async fn queries_use_sanitized_trimmed_text() {
        let backend = MockAssistantBackend::new();
        let mut f = allowing_fixture(backend).await;

        f.orchestrator.send_message("  what is Hades?  ").await.unwrap();

        let stored = f.store.load_messages(f.orchestrator.room().id).await.unwrap();
        assert_eq!(stored[0].text, "what is Hades?");
    }

    #[test]
    fn strip_wrapping_quotes_cases() {
        assert_eq!(strip_wrapping_quotes("\"hello\""), "hello");
        assert_eq!(strip_wrapping_quotes("hello"), "hello");
        assert_eq!(strip_wrapping_quotes("'hello'"), "hello");
        assert_eq!(strip_wrapping_quotes("\u{201C}hello\u{201D}"), "hello");
        // Only one layer comes off.
        assert_eq!(strip_wrapping_quotes("\"\"hello\"\""), "\"hello\"");
        // Mismatched pair stays.
        assert_eq!(strip_wrapping_quotes("\"hello'"), "\"hello'");
        // Degenerate inputs stay.
        assert_eq!(strip_wrapping_quotes("\"\""), "\"\"");
        assert_eq!(strip_wrapping_quotes("\""), "\"");
        assert_eq!(strip_wrapping_quotes(""), "");
    }
}
