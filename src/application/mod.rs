//! Application layer - turn orchestration.
//!
//! Coordinates domain services and ports to run one conversation turn at a
//! time per room.

mod orchestrator;

pub use orchestrator::{ConfigurationError, ConversationOrchestrator, SendError, TurnOutcome};
