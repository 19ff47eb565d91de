//! Unified error type for the Parley service.

use parley_presence::PresenceError;
use parley_protocol::{CODE_INVALID_INPUT, CODE_UNAVAILABLE, ProtocolError};
use parley_room::RoomError;
use parley_transport::TransportError;

/// Top-level error for the coordinator and server.
///
/// Two kinds matter to a caller: `InvalidInput` (their mistake, never
/// retried by the service) and everything from the transport (passed up
/// unchanged). Room and presence errors are always input errors and are
/// folded into `InvalidInput`.
#[derive(Debug, thiserror::Error)]
pub enum ParleyError {
    /// A field was empty or otherwise unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A transport-level error (connection, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl ParleyError {
    /// The wire error code for this error.
    pub fn code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) | Self::Protocol(_) => CODE_INVALID_INPUT,
            Self::Transport(_) => CODE_UNAVAILABLE,
        }
    }

    /// Returns `true` for caller mistakes.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

impl From<RoomError> for ParleyError {
    fn from(err: RoomError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<PresenceError> for ParleyError {
    fn from(err: PresenceError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
