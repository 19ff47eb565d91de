//! Error types for the presence layer.

/// Errors that can occur while recording presence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresenceError {
    /// The username was empty.
    #[error("username must not be empty")]
    InvalidInput,
}
