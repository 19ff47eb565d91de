//! In-memory room store for Parley.
//!
//! The store is the only place chat messages live. Rooms are created the
//! first time anything references them and are never deleted; each room's
//! history only grows, in arrival order.
//!
//! # Key types
//!
//! - [`RoomStore`]: name → room map; append, history snapshots, listing
//! - [`RoomHandle`]: one room; cheap to clone
//! - [`StoreConfig`]: rooms to pre-create
//!
//! # Locking
//!
//! One `RwLock` per room guards its history. Appends take the write lock
//! for the stamp-and-push only, so two appends to the same room are stored
//! in the order they complete, and appends to different rooms never wait
//! on each other.

mod config;
mod error;
mod room;
mod store;

pub use config::{DEFAULT_ROOMS, StoreConfig};
pub use error::RoomError;
pub use room::RoomHandle;
pub use store::RoomStore;
