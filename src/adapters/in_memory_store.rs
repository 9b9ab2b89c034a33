//! In-memory message store.
//!
//! Backs tests and previews without a database. Rooms must be registered
//! before messages can be appended, mirroring the real persistence layer
//! where rooms are created by the room list screen.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::chat::{Message, Room, RoomId};
use crate::ports::{MessageStore, MessageStoreError};

#[derive(Debug, Clone)]
struct RoomRecord {
    room: Room,
    messages: Vec<Message>,
}

/// In-memory implementation of the MessageStore port.
#[derive(Debug, Default)]
pub struct InMemoryMessageStore {
    rooms: RwLock<HashMap<RoomId, RoomRecord>>,
}

impl InMemoryMessageStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a room. Existing messages for a re-registered room are kept.
    pub async fn insert_room(&self, room: Room) {
        let mut rooms = self.rooms.write().await;
        rooms
            .entry(room.id)
            .and_modify(|record| record.room = room.clone())
            .or_insert(RoomRecord {
                room,
                messages: Vec::new(),
            });
    }

    /// Returns a snapshot of a room, if registered.
    pub async fn room(&self, room: RoomId) -> Option<Room> {
        self.rooms.read().await.get(&room).map(|r| r.room.clone())
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn load_messages(&self, room: RoomId) -> Result<Vec<Message>, MessageStoreError> {
        let rooms = self.rooms.read().await;
        rooms
            .get(&room)
            .map(|record| record.messages.clone())
            .ok_or(MessageStoreError::RoomNotFound(room))
    }

    async fn append_message(
        &self,
        room: RoomId,
        message: Message,
    ) -> Result<(), MessageStoreError> {
        let mut rooms = self.rooms.write().await;
        let record = rooms
            .get_mut(&room)
            .ok_or(MessageStoreError::RoomNotFound(room))?;
        record.messages.push(message);
        Ok(())
    }

    async fn touch_room(&self, room: RoomId) -> Result<(), MessageStoreError> {
        let mut rooms = self.rooms.write().await;
        let record = rooms
            .get_mut(&room)
            .ok_or(MessageStoreError::RoomNotFound(room))?;
        record.room.updated_at = Utc::now();
        Ok(())
    }
}
