//! Core error types
//!
//! Re-exports llarena-error and provides game-specific conveniences.

// Re-export the core error types
pub use llarena_error::{Error, ErrorKind, ErrorStatus, Result};

// =============================================================================
// Game-specific error constructors
// =============================================================================

/// Create a ConfigInvalid error
pub fn config_invalid(message: impl Into<String>) -> Error {
    Error::config_invalid(message)
}

/// Create a SessionNotFound error
pub fn session_not_found(game_id: impl Into<String>) -> Error {
    Error::session_not_found(game_id)
}

/// Create a CorruptState error
pub fn corrupt_state(message: impl Into<String>) -> Error {
    Error::corrupt_state(message)
}

/// Create an InvalidPosition error
pub fn invalid_position(row: usize, col: usize, size: usize) -> Error {
    Error::new(
        ErrorKind::InvalidPosition,
        format!("position ({}, {}) outside {}x{} board", row, col, size, size),
    )
    .with_context("row", row.to_string())
    .with_context("col", col.to_string())
}

/// Create a CellOccupied error
pub fn cell_occupied(row: usize, col: usize) -> Error {
    Error::new(
        ErrorKind::CellOccupied,
        format!("cell ({}, {}) already holds a mark", row, col),
    )
    .with_context("row", row.to_string())
    .with_context("col", col.to_string())
}

/// Create a GameOver error
pub fn game_over(game_id: impl Into<String>) -> Error {
    let game_id = game_id.into();
    Error::new(
        ErrorKind::GameOver,
        format!("game '{}' already reached a terminal state", game_id),
    )
    .with_context("game_id", game_id)
}

/// Create an InvalidPlayer error
pub fn invalid_player(player: u8) -> Error {
    Error::new(
        ErrorKind::InvalidPlayer,
        format!("player {} is not 1 or 2", player),
    )
    .with_context("player", player.to_string())
}

/// Create an OutOfTurn error
pub fn out_of_turn(player: u8, expected: u8) -> Error {
    Error::new(
        ErrorKind::OutOfTurn,
        format!("player {} moved, but it is player {}'s turn", player, expected),
    )
    .with_context("player", player.to_string())
    .with_context("expected", expected.to_string())
}

/// Create a NotInitialized error
pub fn not_initialized(provider: impl Into<String>) -> Error {
    Error::not_initialized(provider)
}

/// Create a GenerationFailed error
pub fn generation_failed(message: impl Into<String>) -> Error {
    Error::generation_failed(message)
}

/// Create an AuthenticationFailed error
pub fn authentication_failed() -> Error {
    Error::new(
        ErrorKind::AuthenticationFailed,
        "credentials rejected by backend",
    )
}

/// Create a RateLimited error
pub fn rate_limited() -> Error {
    Error::new(ErrorKind::RateLimited, "rate limit exceeded").temporary()
}

/// Create a NetworkFailed error
pub fn network_failed(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::NetworkFailed, message)
}

/// Create a StorageFailed error
pub fn storage_failed(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::StorageFailed, message)
}

/// Create a SerializationFailed error
pub fn serialization_error(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::SerializationFailed, message)
}

/// Create an IoFailed error
pub fn io_error(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::IoFailed, message)
}

/// Create a ParseFailed error
pub fn parse_failed(message: impl Into<String>) -> Error {
    Error::parse_failed(message)
}

/// Create an Unsupported error
pub fn unsupported(message: impl Into<String>) -> Error {
    Error::unsupported(message)
}

/// Create an InvalidArgument error
pub fn invalid_argument(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::InvalidArgument, message)
}
