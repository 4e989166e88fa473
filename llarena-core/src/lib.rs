//! # llarena core
//!
//! The game/move state machine and the solver loop that drives two LLM
//! agents through repeated games of N-by-N tic-tac-toe.
//!
//! ## Core Concepts
//! - **Board**: the N-by-N grid with win/draw detection (pure queries)
//! - **Session**: a persisted, identified game with append-only move history
//! - **Store**: pluggable session persistence (file for runs, memory for tests)
//! - **Provider**: trait-based agent communication (Gemini, extensible by name)
//! - **Solver**: alternates two providers over one session until a terminal
//!   state, converting illegal or unparseable moves into forfeits

pub mod board;
pub mod error;
pub mod prompt;
pub mod provider;
pub mod session;
pub mod solver;

pub use board::{Board, Mark};
pub use error::{Error, ErrorKind, ErrorStatus, Result};
pub use prompt::DEFAULT_TEMPLATE;
pub use provider::{
    GeminiProvider, GenerationRequest, LlmProvider, LlmResponse, Provider, ProviderConfig,
    ResponseMetadata,
};
pub use session::{
    FileStore, GameSession, MemoryStore, MoveOutcome, MoveRecord, SessionManager, SessionStore,
};
pub use solver::{parse_reply, GameOutcome, ParsedReply, Solver, SolverConfig};
