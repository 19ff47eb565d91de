//! A single room: its name and its guarded message history.
//!
//! Each room owns its own lock, so traffic on one room never waits on
//! another. The history only ever grows; nothing outside this module can
//! reach the `Vec` mutably.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use parley_protocol::{ChatMessage, RoomSummary, Timestamp};

use crate::RoomError;
use crate::error::require;

struct Room {
    name: String,
    history: RwLock<Vec<ChatMessage>>,
}

/// Shared handle to one room in the store.
///
/// Cheap to clone (an `Arc`). Handles stay valid for the life of the
/// process because rooms are never deleted.
#[derive(Clone)]
pub struct RoomHandle {
    room: Arc<Room>,
}

impl RoomHandle {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            room: Arc::new(Room {
                name: name.to_string(),
                history: RwLock::new(Vec::new()),
            }),
        }
    }

    /// The room's name.
    pub fn name(&self) -> &str {
        &self.room.name
    }

    /// Stores a message stamped with the current time and returns it.
    ///
    /// # Errors
    /// [`RoomError::InvalidInput`] if `username` or `text` is empty.
    pub fn append(&self, username: &str, text: &str) -> Result<ChatMessage, RoomError> {
        self.append_at(username, text, Timestamp::now())
    }

    /// Stamps and pushes under the write lock. `now` is clamped to the last
    /// stored timestamp so history stays non-decreasing if the wall clock
    /// steps backwards.
    pub(crate) fn append_at(
        &self,
        username: &str,
        text: &str,
        now: Timestamp,
    ) -> Result<ChatMessage, RoomError> {
        require("username", username)?;
        require("text", text)?;

        let mut history = self.room.history.write();
        let timestamp = match history.last() {
            Some(prev) if prev.timestamp > now => prev.timestamp,
            _ => now,
        };
        let message = ChatMessage {
            username: username.to_string(),
            text: text.to_string(),
            room: self.room.name.clone(),
            timestamp,
        };
        history.push(message.clone());
        Ok(message)
    }

    /// A snapshot of the history in storage order.
    pub fn history(&self) -> Vec<ChatMessage> {
        self.room.history.read().clone()
    }

    /// Runs `f` over the history while holding the read lock.
    ///
    /// Appends to this room wait until `f` returns; other rooms are
    /// unaffected. Keep `f` short.
    pub fn with_history<R>(&self, f: impl FnOnce(&[ChatMessage]) -> R) -> R {
        f(&self.room.history.read())
    }

    /// Number of stored messages.
    pub fn len(&self) -> usize {
        self.room.history.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name and message count.
    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            name: self.room.name.clone(),
            message_count: self.len(),
        }
    }

    /// Returns `true` if both handles point at the same room.
    pub fn same_room(&self, other: &RoomHandle) -> bool {
        Arc::ptr_eq(&self.room, &other.room)
    }
}

impl fmt::Debug for RoomHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomHandle")
            .field("name", &self.room.name)
            .field("messages", &self.len())
            .finish()
    }
}
