//! # Solver Loop
//!
//! Drives one persisted game to completion by alternating two agent
//! adapters: load state, build a prompt, generate, parse the reply into a
//! move, apply it, repeat.
//!
//! States: `AWAITING_MOVE(player)` -> `MOVE_APPLIED` -> `CONTINUE` (other
//! player) | `GAME_OVER(winner|draw)` | `FORFEITED(player)`.
//!
//! An agent that cannot produce a well-formed legal move loses instantly
//! rather than being retried, keeping each game bounded in wall-clock time
//! and backend calls. Infrastructure failures (store, generation) propagate
//! instead; the caller decides what a failed trial means for the batch.

use crate::board::Mark;
use crate::error::Result;
use crate::prompt;
use crate::provider::{GenerationRequest, LlmProvider};
use crate::session::SessionManager;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Sampling temperature for move generation. A structured single answer is
/// wanted, not creativity.
const MOVE_TEMPERATURE: f32 = 0.1;

// ============================================================================
// Game Outcome
// ============================================================================

/// The result of one completed game.
///
/// Serializes as the integer contract `1`/`2` for a win and `0` for a draw.
/// The forfeiture path always yields a definite winner, never a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Draw,
    Win(u8),
}

impl GameOutcome {
    /// The 0/1/2 integer form
    pub fn as_int(&self) -> u8 {
        match self {
            GameOutcome::Draw => 0,
            GameOutcome::Win(player) => *player,
        }
    }

    /// Parse the 0/1/2 integer form
    pub fn from_int(value: u8) -> Option<GameOutcome> {
        match value {
            0 => Some(GameOutcome::Draw),
            1 | 2 => Some(GameOutcome::Win(value)),
            _ => None,
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Draw => write!(f, "draw"),
            GameOutcome::Win(player) => write!(f, "player {} wins", player),
        }
    }
}

impl Serialize for GameOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_int())
    }
}

impl<'de> Deserialize<'de> for GameOutcome {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        GameOutcome::from_int(value)
            .ok_or_else(|| D::Error::custom(format!("outcome {} is not 0, 1, or 2", value)))
    }
}

// ============================================================================
// Reply Parsing
// ============================================================================

/// The result of parsing an agent reply: either a move or an explicit
/// failure with the reason, so forfeiture handling never leans on a
/// catch-all error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedReply {
    Move { row: i64, col: i64 },
    Malformed { reason: String },
}

#[derive(Deserialize)]
struct MoveReply {
    #[serde(rename = "move")]
    position: MovePosition,
}

#[derive(Deserialize)]
struct MovePosition {
    row: i64,
    col: i64,
}

/// Parse an agent reply against the strict `{"move": {"row", "col"}}`
/// schema. Markdown code fences around the JSON are stripped first; models
/// wrap structured output in fences often enough that rejecting them would
/// skew forfeit counts.
pub fn parse_reply(text: &str) -> ParsedReply {
    let json_str = strip_fences(text);

    match serde_json::from_str::<MoveReply>(json_str) {
        Ok(reply) => ParsedReply::Move {
            row: reply.position.row,
            col: reply.position.col,
        },
        Err(e) => ParsedReply::Malformed {
            reason: e.to_string(),
        },
    }
}

fn strip_fences(content: &str) -> &str {
    if content.contains("```json") {
        content
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(|s| s.trim())
            .unwrap_or(content)
    } else if content.contains("```") {
        content
            .split("```")
            .nth(1)
            .map(|s| s.trim())
            .unwrap_or(content)
    } else {
        content.trim()
    }
}

// ============================================================================
// Solver
// ============================================================================

/// Configuration for the solver loop
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Sampling temperature sent with every move request
    pub temperature: f32,
    /// Optional cap on generated tokens
    pub max_tokens: Option<usize>,
    /// Model override; None uses each provider's default
    pub model: Option<String>,
    /// Print per-move progress
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            temperature: MOVE_TEMPERATURE,
            max_tokens: None,
            model: None,
            verbose: false,
        }
    }
}

/// Plays one game between two agent adapters over a persisted session.
///
/// Player 1 (X) always moves first. The session store is re-read before
/// every move; no in-memory session state survives across moves.
pub struct Solver<P1, P2> {
    player_one: P1,
    player_two: P2,
    sessions: SessionManager,
    template: String,
    config: SolverConfig,
}

impl<P1: LlmProvider, P2: LlmProvider> Solver<P1, P2> {
    pub fn new(player_one: P1, player_two: P2, sessions: SessionManager) -> Self {
        Self {
            player_one,
            player_two,
            sessions,
            template: prompt::DEFAULT_TEMPLATE.to_string(),
            config: SolverConfig::default(),
        }
    }

    /// Replace the prompt template (placeholders per the prompt module)
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Access the underlying session manager (e.g. to inspect finished games)
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Play one game to completion.
    ///
    /// Returns the winner (`Win(1)`/`Win(2)`) or `Draw`. A malformed reply or
    /// an illegal move forfeits the game to the other player. Store and
    /// generation errors propagate.
    pub async fn play_game(&self, board_size: usize) -> Result<GameOutcome> {
        let game_id = self.sessions.create_game(board_size)?;
        let mut current_player: u8 = 1;

        loop {
            let session = self.sessions.load_game(&game_id)?;
            let mark = Mark::for_player(current_player)?;

            let mut request = GenerationRequest::new(prompt::build_prompt(
                &self.template,
                &session,
                mark,
            ))
            .with_temperature(self.config.temperature);
            if let Some(model) = &self.config.model {
                request = request.with_model(model.clone());
            }
            if let Some(max_tokens) = self.config.max_tokens {
                request = request.with_max_tokens(max_tokens);
            }

            let response = match current_player {
                1 => self.player_one.generate(request).await?,
                _ => self.player_two.generate(request).await?,
            };

            let position = match parse_reply(&response.text) {
                ParsedReply::Move { row, col } => {
                    match (usize::try_from(row), usize::try_from(col)) {
                        (Ok(row), Ok(col)) => (row, col),
                        // Negative coordinates are an illegal move, not a parse error
                        _ => return Ok(self.forfeit(&game_id, current_player, "negative position")),
                    }
                }
                ParsedReply::Malformed { reason } => {
                    return Ok(self.forfeit(&game_id, current_player, &reason));
                }
            };

            let outcome = match self.sessions.apply_move(&game_id, current_player, position) {
                Ok(outcome) => outcome,
                Err(err) if err.kind().is_move_violation() => {
                    return Ok(self.forfeit(&game_id, current_player, &err.to_string()));
                }
                Err(err) => return Err(err),
            };

            if self.config.verbose {
                println!(
                    "[{}] player {} ({}) -> ({}, {})",
                    game_id, current_player, mark, position.0, position.1
                );
            }

            if outcome.terminal {
                return Ok(outcome
                    .winner
                    .map(GameOutcome::Win)
                    .unwrap_or(GameOutcome::Draw));
            }

            current_player = 3 - current_player;
        }
    }

    fn forfeit(&self, game_id: &str, player: u8, reason: &str) -> GameOutcome {
        if self.config.verbose {
            println!("[{}] player {} forfeits: {}", game_id, player, reason);
        }
        GameOutcome::Win(3 - player)
    }
}
