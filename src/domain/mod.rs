//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `chat` - Messages, rooms, and server-context tracking
//! - `gate` - Domain admission filter over the binary classifier
//! - `intent` - Response-style resolution over the intent classifier
//! - `prompt` - Deterministic prompt and context-summary assembly

pub mod chat;
pub mod gate;
pub mod intent;
pub mod prompt;
