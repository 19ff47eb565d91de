//! Presence tracking for Parley.
//!
//! Clients send a heartbeat every few seconds; this crate remembers the
//! last one per username so the service can answer "when was this user
//! last seen?" and "are they online?".
//!
//! ```text
//! Coordinator (above)  ← heartbeat() / last_seen()
//!     ↕
//! Presence (this crate)  ← username → last heartbeat
//!     ↕
//! Protocol (below)  ← Timestamp
//! ```
//!
//! Nothing here runs in the background. Records are only written by
//! heartbeats and are kept for the life of the process.

mod config;
mod error;
mod tracker;

pub use config::PresenceConfig;
pub use error::PresenceError;
pub use tracker::PresenceTracker;
