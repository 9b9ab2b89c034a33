//! Chat room entity
//!
//! One room maps to one remote conversation context. `updated_at` is touched
//! on every message append so room lists can sort by recency.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Room ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(Uuid);

impl RoomId {
    /// Generates a fresh room ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A conversation room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub title: String,
    pub is_default: bool,
    /// Client key the room's remote context was created under.
    pub remote_session_key: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// Creates a new room.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: RoomId::new(),
            title: title.into(),
            is_default: false,
            remote_session_key: None,
            updated_at: Utc::now(),
        }
    }

    /// Marks this room as the default room.
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Records the client key the remote context was created under.
    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.remote_session_key = Some(key.into());
        self
    }

    /// Bumps `updated_at` to now. Called on every message append.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_builder_works() {
        let room = Room::new("Cozy games")
            .as_default()
            .with_session_key("pdx-client-1");

        assert_eq!(room.title, "Cozy games");
        assert!(room.is_default);
        assert_eq!(room.remote_session_key.as_deref(), Some("pdx-client-1"));
    }

    #[test]
    fn touch_advances_updated_at() {
        let mut room = Room::new("RPG picks");
        let before = room.updated_at;
        room.touch();

        assert!(room.updated_at >= before);
    }

    #[test]
    fn room_ids_are_unique() {
        assert_ne!(Room::new("a").id, Room::new("b").id);
    }
}
