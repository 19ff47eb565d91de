//! The presence tracker: last heartbeat per user.
//!
//! # Concurrency note
//!
//! Records live in a `DashMap`, so touches for different users land on
//! different shards and touches for the same user serialize on one. The
//! tracker shares no lock with the room store.

use dashmap::DashMap;
use parley_protocol::Timestamp;

use crate::{PresenceConfig, PresenceError};

/// Records when each user was last heard from.
///
/// ```text
/// unknown ──touch()──→ seen(t) ──touch()──→ seen(t' >= t) ──→ ...
/// ```
///
/// A record is overwritten by every heartbeat and never removed: a stale
/// record means the user was here once, not that they are here now. Use
/// [`is_online`](Self::is_online) for the latter.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    last_seen: DashMap<String, Timestamp>,
    config: PresenceConfig,
}

impl PresenceTracker {
    /// Creates an empty tracker.
    pub fn new(config: PresenceConfig) -> Self {
        Self {
            last_seen: DashMap::new(),
            config,
        }
    }

    /// Records a heartbeat from `username` at the current time and returns
    /// the stored last-seen value.
    ///
    /// # Errors
    /// [`PresenceError::InvalidInput`] if `username` is empty.
    pub fn touch(&self, username: &str) -> Result<Timestamp, PresenceError> {
        self.touch_at(username, Timestamp::now())
    }

    /// The stored value only moves forward. A touch carrying an older time
    /// (a racing thread, or a clock step backwards) leaves it unchanged.
    pub(crate) fn touch_at(
        &self,
        username: &str,
        now: Timestamp,
    ) -> Result<Timestamp, PresenceError> {
        if username.is_empty() {
            return Err(PresenceError::InvalidInput);
        }

        let recorded = *self
            .last_seen
            .entry(username.to_string())
            .and_modify(|seen| {
                if *seen < now {
                    *seen = now;
                }
            })
            .or_insert(now);

        tracing::debug!(username, last_seen = %recorded, "heartbeat recorded");
        Ok(recorded)
    }

    /// When `username` last sent a heartbeat, or `None` if never.
    pub fn last_seen(&self, username: &str) -> Option<Timestamp> {
        self.last_seen.get(username).map(|seen| *seen)
    }

    /// Returns `true` if `username`'s last heartbeat is within the idle
    /// window.
    pub fn is_online(&self, username: &str) -> bool {
        self.is_online_at(username, Timestamp::now())
    }

    pub(crate) fn is_online_at(&self, username: &str, now: Timestamp) -> bool {
        let window = i64::try_from(self.config.idle_window.as_secs()).unwrap_or(i64::MAX);
        self.last_seen(username)
            .is_some_and(|seen| now.seconds_since(seen) < window)
    }

    /// Number of users ever seen.
    pub fn len(&self) -> usize {
        self.last_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }

    /// The tracker's configuration.
    pub fn config(&self) -> &PresenceConfig {
        &self.config
    }
}

// =========================================================================
// Tests
// =========================================================================
