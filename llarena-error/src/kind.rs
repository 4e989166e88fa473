//! Error kinds for llarena operations

use std::fmt;

/// The kind of error that occurred.
///
/// This enum categorizes errors to help users write clear error handling logic.
/// Users can match on ErrorKind to decide how to handle specific error cases.
/// The solver loop in particular matches on [`ErrorKind::is_move_violation`]
/// to convert illegal moves into forfeits instead of propagating them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// An unexpected error occurred - catch-all for unhandled cases
    Unexpected,

    /// The requested feature, backend, or operation is not supported
    Unsupported,

    /// Invalid configuration or construction parameters
    ConfigInvalid,

    // =========================================================================
    // Session/persistence errors
    // =========================================================================
    /// No persisted game exists for the requested id
    SessionNotFound,

    /// Persisted game state exists but cannot be parsed
    CorruptState,

    /// Store operation failed
    StorageFailed,

    /// Serialization/deserialization failed
    SerializationFailed,

    // =========================================================================
    // Move validation errors
    // =========================================================================
    /// Row or column outside the board
    InvalidPosition,

    /// Target cell already holds a mark
    CellOccupied,

    /// The game already reached a terminal state
    GameOver,

    /// Player number outside {1, 2}
    InvalidPlayer,

    /// The move was made by a player out of turn order
    OutOfTurn,

    // =========================================================================
    // Agent adapter errors
    // =========================================================================
    /// Generate was called before the provider was initialized
    NotInitialized,

    /// The backend failed to produce a completion
    GenerationFailed,

    /// Credentials were rejected by the backend
    AuthenticationFailed,

    /// Rate limit exceeded
    RateLimited,

    // =========================================================================
    // IO errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,

    /// Network error
    NetworkFailed,

    // =========================================================================
    // Parse errors
    // =========================================================================
    /// Failed to parse input
    ParseFailed,

    /// Invalid argument passed to function
    InvalidArgument,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            // General
            ErrorKind::Unexpected => "Unexpected",
            ErrorKind::Unsupported => "Unsupported",
            ErrorKind::ConfigInvalid => "ConfigInvalid",

            // Session/persistence
            ErrorKind::SessionNotFound => "SessionNotFound",
            ErrorKind::CorruptState => "CorruptState",
            ErrorKind::StorageFailed => "StorageFailed",
            ErrorKind::SerializationFailed => "SerializationFailed",

            // Move validation
            ErrorKind::InvalidPosition => "InvalidPosition",
            ErrorKind::CellOccupied => "CellOccupied",
            ErrorKind::GameOver => "GameOver",
            ErrorKind::InvalidPlayer => "InvalidPlayer",
            ErrorKind::OutOfTurn => "OutOfTurn",

            // Agent adapter
            ErrorKind::NotInitialized => "NotInitialized",
            ErrorKind::GenerationFailed => "GenerationFailed",
            ErrorKind::AuthenticationFailed => "AuthenticationFailed",
            ErrorKind::RateLimited => "RateLimited",

            // IO
            ErrorKind::FileNotFound => "FileNotFound",
            ErrorKind::PermissionDenied => "PermissionDenied",
            ErrorKind::IoFailed => "IoFailed",
            ErrorKind::NetworkFailed => "NetworkFailed",

            // Parse
            ErrorKind::ParseFailed => "ParseFailed",
            ErrorKind::InvalidArgument => "InvalidArgument",
        }
    }

    /// Check if this error kind is retryable by default
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::GenerationFailed | ErrorKind::NetworkFailed | ErrorKind::RateLimited
        )
    }

    /// Check if this error kind means the acting player attempted an illegal
    /// move. The solver resolves these locally as a forfeit; everything else
    /// is an infrastructure failure and propagates.
    pub fn is_move_violation(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidPosition
                | ErrorKind::CellOccupied
                | ErrorKind::GameOver
                | ErrorKind::InvalidPlayer
                | ErrorKind::OutOfTurn
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::CellOccupied.to_string(), "CellOccupied");
        assert_eq!(ErrorKind::GenerationFailed.to_string(), "GenerationFailed");
    }

    #[test]
    fn test_is_retryable() {
        assert!(ErrorKind::NetworkFailed.is_retryable());
        assert!(ErrorKind::RateLimited.is_retryable());
        assert!(!ErrorKind::SessionNotFound.is_retryable());
        assert!(!ErrorKind::CellOccupied.is_retryable());
    }

    #[test]
    fn test_is_move_violation() {
        assert!(ErrorKind::InvalidPosition.is_move_violation());
        assert!(ErrorKind::CellOccupied.is_move_violation());
        assert!(ErrorKind::GameOver.is_move_violation());
        assert!(ErrorKind::InvalidPlayer.is_move_violation());
        assert!(ErrorKind::OutOfTurn.is_move_violation());
        assert!(!ErrorKind::GenerationFailed.is_move_violation());
        assert!(!ErrorKind::SessionNotFound.is_move_violation());
    }
}
