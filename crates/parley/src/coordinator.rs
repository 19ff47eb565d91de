//! The chat coordinator: the service's operations, transport-free.
//!
//! Every public method validates its arguments first and only then touches
//! the room store or presence tracker, so a rejected call has no side
//! effects. None of them await; the only waiting is on the target room's
//! lock or a presence shard.

use parley_presence::{PresenceConfig, PresenceTracker};
use parley_protocol::{ChatMessage, Presence, RoomSummary};
use parley_room::{RoomStore, StoreConfig};

use crate::ParleyError;

/// Implements Join, SendMessage and Heartbeat (plus the LastSeen and
/// ListRooms queries) over a [`RoomStore`] and a [`PresenceTracker`].
///
/// Holds no per-call state. Share it behind an `Arc`.
#[derive(Debug)]
pub struct ChatCoordinator {
    rooms: RoomStore,
    presence: PresenceTracker,
}

impl ChatCoordinator {
    /// Builds a coordinator with a fresh store and tracker.
    pub fn new(store_config: &StoreConfig, presence_config: PresenceConfig) -> Self {
        Self {
            rooms: RoomStore::with_config(store_config),
            presence: PresenceTracker::new(presence_config),
        }
    }

    /// Enters `room` and returns its history at this moment.
    ///
    /// Creates the room if it doesn't exist, so it is visible to later
    /// joiners and senders even while empty. Nothing is pushed to the
    /// caller afterwards; a client sees new messages by joining again.
    pub fn join(&self, username: &str, room: &str) -> Result<Vec<ChatMessage>, ParleyError> {
        require("username", username)?;
        require("room", room)?;

        let history = self.rooms.ensure_room(room)?.history();
        tracing::info!(username, room, history = history.len(), "user joined");
        Ok(history)
    }

    /// Stores `text` from `username` in `room`.
    pub fn send_message(&self, username: &str, text: &str, room: &str) -> Result<(), ParleyError> {
        require("username", username)?;
        require("text", text)?;
        require("room", room)?;

        let stored = self.rooms.append(room, username, text)?;
        tracing::info!(room, username, timestamp = %stored.timestamp, "message stored");
        Ok(())
    }

    /// Records a heartbeat from `username`.
    pub fn heartbeat(&self, username: &str) -> Result<(), ParleyError> {
        require("username", username)?;

        self.presence.touch(username)?;
        Ok(())
    }

    /// When `username` last sent a heartbeat, and whether that is recent
    /// enough to count as online.
    pub fn last_seen(&self, username: &str) -> Result<Presence, ParleyError> {
        require("username", username)?;

        Ok(Presence {
            username: username.to_string(),
            last_seen: self.presence.last_seen(username),
            online: self.presence.is_online(username),
        })
    }

    /// Every room with its message count, sorted by name.
    pub fn list_rooms(&self) -> Vec<RoomSummary> {
        self.rooms.summaries()
    }

    /// Read access to the room store.
    pub fn rooms(&self) -> &RoomStore {
        &self.rooms
    }

    /// Read access to the presence tracker.
    pub fn presence(&self) -> &PresenceTracker {
        &self.presence
    }
}

impl Default for ChatCoordinator {
    fn default() -> Self {
        Self::new(&StoreConfig::default(), PresenceConfig::default())
    }
}

fn require(field: &str, value: &str) -> Result<(), ParleyError> {
    if value.is_empty() {
        return Err(ParleyError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(())
}
