//! Presence configuration.

use std::time::Duration;

/// Configuration for a [`PresenceTracker`](crate::PresenceTracker).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceConfig {
    /// How long after their last heartbeat a user still counts as online.
    ///
    /// Only affects [`is_online`](crate::PresenceTracker::is_online).
    /// Records are never removed, whatever this is set to. Default: 15
    /// seconds, i.e. three missed heartbeats from a client sending every 5.
    pub idle_window: Duration,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            idle_window: Duration::from_secs(15),
        }
    }
}
