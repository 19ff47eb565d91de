//! Room store configuration.

/// Rooms that exist before anyone joins, matching what existing clients
/// expect to find on a fresh server.
pub const DEFAULT_ROOMS: [&str; 2] = ["general", "sports"];

/// Configuration for a [`RoomStore`](crate::RoomStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Rooms created empty when the store is built. Empty names are
    /// skipped. Any other room is still created lazily on first use.
    pub default_rooms: Vec<String>,
}

impl StoreConfig {
    /// A config with no pre-created rooms.
    pub fn empty() -> Self {
        Self {
            default_rooms: Vec::new(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_rooms: DEFAULT_ROOMS.iter().map(|r| r.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config_default_has_general_and_sports() {
        let config = StoreConfig::default();
        assert_eq!(config.default_rooms, vec!["general", "sports"]);
    }

    #[test]
    fn test_store_config_empty_has_no_rooms() {
        assert!(StoreConfig::empty().default_rooms.is_empty());
    }
}
