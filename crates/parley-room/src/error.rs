//! Error types for the room layer.

/// Errors that can occur during room store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// A required field was empty. Carries the field name.
    #[error("{0} must not be empty")]
    InvalidInput(&'static str),
}

/// Rejects an empty `value` for the named field.
pub(crate) fn require(field: &'static str, value: &str) -> Result<(), RoomError> {
    if value.is_empty() {
        return Err(RoomError::InvalidInput(field));
    }
    Ok(())
}
