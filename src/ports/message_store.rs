//! Message Store Port - persistence collaborator for rooms and messages.
//!
//! The gateway does not own durable storage; the embedding app supplies an
//! implementation (SQLite, Core Data bridge, …). An in-memory adapter backs
//! the tests.

use async_trait::async_trait;

use crate::domain::chat::{Message, RoomId};

/// Port for per-room message persistence.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Loads the ordered message list for a room.
    async fn load_messages(&self, room: RoomId) -> Result<Vec<Message>, MessageStoreError>;

    /// Appends a message to a room's history.
    async fn append_message(
        &self,
        room: RoomId,
        message: Message,
    ) -> Result<(), MessageStoreError>;

    /// Bumps the room's `updated_at` to now.
    async fn touch_room(&self, room: RoomId) -> Result<(), MessageStoreError>;
}

/// Message store errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MessageStoreError {
    #[error("room not found: {0}")]
    RoomNotFound(RoomId),

    #[error("storage failure: {0}")]
    Storage(String),
}

impl MessageStoreError {
    /// Creates a storage failure error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}
