//! Server-side conversation context tracking
//!
//! The remote backend keeps one conversational context per client key. This
//! state machine records which room that context currently reflects, so the
//! orchestrator can decide with a single predicate whether a
//! reset-and-reinject cycle is required before the next user turn.

use super::room::RoomId;

/// Tracks whether the remote backend's context matches the active room.
///
/// Invariant: `Synced { room_id }` with `room_id` equal to the current room
/// means the backend already carries this room's system prompt; any mismatch
/// (or `Stale`) forces a reset before the next user message goes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerContext {
    /// No room's context is known to be live on the server.
    Stale,
    /// The server context reflects `room_id`. `first_user_message_pending`
    /// stays true until the first user message after the sync succeeds.
    Synced {
        room_id: RoomId,
        first_user_message_pending: bool,
    },
}

impl ServerContext {
    /// Fresh, unsynchronized state.
    pub fn new() -> Self {
        ServerContext::Stale
    }

    /// Whether a reset-and-reinject cycle is needed before sending for `room`.
    pub fn needs_sync(&self, room: RoomId) -> bool {
        match self {
            ServerContext::Stale => true,
            ServerContext::Synced { room_id, .. } => *room_id != room,
        }
    }

    /// Records a completed reset + system-prompt injection for `room`.
    pub fn mark_synced(&mut self, room: RoomId) {
        *self = ServerContext::Synced {
            room_id: room,
            first_user_message_pending: true,
        };
    }

    /// Whether the next user message is the first since the last sync.
    pub fn first_message_pending(&self) -> bool {
        matches!(
            self,
            ServerContext::Synced {
                first_user_message_pending: true,
                ..
            }
        )
    }

    /// Records that the first post-sync user message went through.
    pub fn mark_first_message_sent(&mut self) {
        if let ServerContext::Synced {
            first_user_message_pending,
            ..
        } = self
        {
            *first_user_message_pending = false;
        }
    }

    /// Invalidates the tracked context. Called when the bound room changes.
    pub fn invalidate(&mut self) {
        *self = ServerContext::Stale;
    }
}

impl Default for ServerContext {
    fn default() -> Self {
        Self::new()
    }
}
