//! The room store: every room on the server, keyed by name.

use dashmap::DashMap;
use parley_protocol::{ChatMessage, RoomSummary};

use crate::error::require;
use crate::{RoomError, RoomHandle, StoreConfig};

/// Owns every room and all stored messages.
///
/// The name → room map is a `DashMap`, so lookups and creations on
/// different names rarely contend. Each room has its own lock for its
/// history, and no method holds a map guard while taking a room lock.
///
/// Rooms are created on first reference and never removed.
#[derive(Debug, Default)]
pub struct RoomStore {
    rooms: DashMap<String, RoomHandle>,
}

impl RoomStore {
    /// Creates an empty store with no rooms.
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    /// Creates a store and pre-creates `config.default_rooms`.
    pub fn with_config(config: &StoreConfig) -> Self {
        let store = Self::new();
        for name in &config.default_rooms {
            if store.ensure_room(name).is_err() {
                tracing::warn!("skipping default room with an empty name");
            }
        }
        store
    }

    /// Returns the room called `name`, creating it empty if needed.
    ///
    /// Idempotent: concurrent callers racing on a new name all get the
    /// same room.
    ///
    /// # Errors
    /// [`RoomError::InvalidInput`] if `name` is empty; nothing is created.
    pub fn ensure_room(&self, name: &str) -> Result<RoomHandle, RoomError> {
        require("room", name)?;

        if let Some(existing) = self.rooms.get(name) {
            return Ok(existing.value().clone());
        }
        let room = self
            .rooms
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::info!(room = name, "room created");
                RoomHandle::new(name)
            })
            .value()
            .clone();
        Ok(room)
    }

    /// Returns the room called `name` if it exists.
    pub fn get(&self, name: &str) -> Option<RoomHandle> {
        self.rooms.get(name).map(|entry| entry.value().clone())
    }

    /// Returns `true` if a room called `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.rooms.contains_key(name)
    }

    /// Stores a message in room `name`, creating the room if needed.
    ///
    /// All fields are checked before anything is touched, so a rejected
    /// call never creates a room.
    ///
    /// # Errors
    /// [`RoomError::InvalidInput`] if `name`, `username` or `text` is empty.
    pub fn append(
        &self,
        name: &str,
        username: &str,
        text: &str,
    ) -> Result<ChatMessage, RoomError> {
        require("room", name)?;
        require("username", username)?;
        require("text", text)?;

        self.ensure_room(name)?.append(username, text)
    }

    /// A snapshot of room `name`'s history. Empty (not an error) if the
    /// room doesn't exist; the room is not created.
    pub fn history(&self, name: &str) -> Vec<ChatMessage> {
        self.get(name).map(|room| room.history()).unwrap_or_default()
    }

    /// Number of rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Name and message count of every room, sorted by name.
    pub fn summaries(&self) -> Vec<RoomSummary> {
        // Clone handles out first so no map guard is held while each
        // room's lock is taken.
        let handles: Vec<RoomHandle> = self
            .rooms
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        let mut summaries: Vec<RoomSummary> = handles.iter().map(RoomHandle::summary).collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }
}
