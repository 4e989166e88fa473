//! # llarena-error
//!
//! Unified error handling for llarena - following OpenDAL's error handling practices.
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: Know what error occurred (e.g., CellOccupied, GenerationFailed)
//! - **ErrorStatus**: Decide how to handle it (Permanent, Temporary, Persistent)
//! - **Error Context**: Assist in locating the cause with rich context
//! - **Error Source**: Wrap underlying errors without leaking raw types
//!
//! ## Usage
//!
//! ```rust
//! use llarena_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::CellOccupied, "cell (1, 1) already holds a mark")
//!         .with_operation("session::apply_move")
//!         .with_context("game_id", "game_18f2a_1")
//!         .with_context("player", "2"))
//! }
//! ```
//!
//! ## Principles
//!
//! - All functions return `Result<T, llarena_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - Same error handled once, subsequent ops only append context
//! - Don't abuse `From<OtherError>` to prevent raw error leakage

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using llarena Error
pub type Result<T> = std::result::Result<T, Error>;
