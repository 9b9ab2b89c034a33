//! Chat domain entities
//!
//! Messages, rooms, and the per-orchestrator server context state machine.

mod context;
mod message;
mod room;

pub use context::ServerContext;
pub use message::{Message, MessageAuthor, MessageId};
pub use room::{Room, RoomId};
