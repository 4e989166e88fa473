//! # Game Sessions
//!
//! A session is one persisted, identified game: the board, the append-only
//! move history, and the terminal flag. Persistence is the single source of
//! truth between calls - `SessionManager::apply_move` always reloads from the
//! store, mutates, and saves back, so every move application is independently
//! inspectable. The store is last-writer-wins per id; sessions are not safe
//! for concurrent writers on the same id.
//!
//! Persistence goes through one trait with a file implementation for real
//! runs and an in-memory implementation for tests.

use crate::board::{Board, Mark};
use crate::error::{self, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// One applied move, as recorded in the history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Player number (1 or 2)
    pub player: u8,
    /// `[row, col]`
    pub position: [usize; 2],
    /// The mark written into the cell
    pub mark: Mark,
}

/// What a successful move application reports back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Whether the game ended with this move
    pub terminal: bool,
    /// The winning player number, if a winning line now exists
    pub winner: Option<u8>,
}

/// A persisted game in progress or finished
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    /// Unique identifier, stable for the lifetime of the game
    pub id: String,
    /// Board size N
    pub size: usize,
    /// The N-by-N grid
    pub board: Board,
    /// Append-only list of applied moves
    pub move_history: Vec<MoveRecord>,
    /// Once true, no further moves may be applied
    pub terminal: bool,
    /// The winning mark, if the game ended with a winner
    pub winner: Option<Mark>,
}

/// Process-wide sequence for id generation
static NEXT_GAME_SEQ: AtomicU64 = AtomicU64::new(0);

impl GameSession {
    /// Create a new empty session with a fresh id.
    /// Fails with ConfigInvalid when `size < 1`.
    pub fn new(size: usize) -> Result<Self> {
        Ok(Self {
            id: Self::generate_id(),
            size,
            board: Board::new(size)?,
            move_history: Vec::new(),
            terminal: false,
            winner: None,
        })
    }

    /// Generate a unique game id.
    ///
    /// Millisecond timestamp plus a process-wide counter, so rapid
    /// sequential creation cannot collide the way a bare timestamp would.
    pub fn generate_id() -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let seq = NEXT_GAME_SEQ.fetch_add(1, Ordering::Relaxed);
        format!("game_{:x}_{}", ts, seq)
    }

    /// Whose turn it is, derived from history parity (never stored)
    pub fn expected_player(&self) -> u8 {
        (self.move_history.len() % 2) as u8 + 1
    }

    /// Validate and apply one move, then re-detect terminality.
    ///
    /// Validation order: position in bounds, cell empty, game not over,
    /// player in {1, 2}, player's turn. The turn check rejects out-of-order
    /// moves with OutOfTurn; a well-behaved driver alternates and never
    /// trips it.
    pub fn apply(&mut self, player: u8, position: (usize, usize)) -> Result<MoveOutcome> {
        let (row, col) = position;

        if row >= self.size || col >= self.size {
            return Err(
                error::invalid_position(row, col, self.size).with_operation("session::apply")
            );
        }
        if self.board.get(row, col).is_some() {
            return Err(error::cell_occupied(row, col).with_operation("session::apply"));
        }
        if self.terminal {
            return Err(error::game_over(&self.id).with_operation("session::apply"));
        }
        let mark = Mark::for_player(player)?;
        let expected = self.expected_player();
        if player != expected {
            return Err(error::out_of_turn(player, expected)
                .with_operation("session::apply")
                .with_context("game_id", &self.id));
        }

        self.board.place(row, col, mark)?;
        self.move_history.push(MoveRecord {
            player,
            position: [row, col],
            mark,
        });

        let winner_mark = self.board.detect_winner();
        if winner_mark.is_some() || self.board.is_full() {
            self.terminal = true;
            self.winner = winner_mark;
        }

        Ok(MoveOutcome {
            terminal: self.terminal,
            winner: winner_mark.map(|mark| mark.player()),
        })
    }
}

// =============================================================================
// Store Trait
// =============================================================================

/// Trait for session persistence backends.
///
/// Implement this to add new stores; the save/load round-trip must be exact.
pub trait SessionStore: Send + Sync {
    /// Persist a session, overwriting any previous state for the same id
    fn save(&self, session: &GameSession) -> Result<()>;

    /// Load a session by id.
    /// Fails with SessionNotFound when absent, CorruptState when unparseable.
    fn load(&self, game_id: &str) -> Result<GameSession>;

    /// List all persisted game ids
    fn list(&self) -> Result<Vec<String>>;

    /// Delete a persisted session
    fn delete(&self, game_id: &str) -> Result<()>;

    /// Check if a session exists
    fn exists(&self, game_id: &str) -> bool {
        self.load(game_id).is_ok()
    }

    /// Get store name for debugging
    fn store_name(&self) -> &'static str;
}

// =============================================================================
// File-based Store (one JSON file per game)
// =============================================================================

/// File-based session store.
///
/// Structure:
/// ```text
/// {base_path}/
///   {game_id}.json   # Full serialized session
/// ```
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a new file store, creating the base directory if needed
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_path)
            .map_err(|e| error::io_error(format!("Failed to create games dir: {}", e)))?;
        Ok(Self { base_path })
    }

    fn game_path(&self, game_id: &str) -> PathBuf {
        let safe_id = game_id.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");
        self.base_path.join(format!("{}.json", safe_id))
    }
}

impl SessionStore for FileStore {
    fn save(&self, session: &GameSession) -> Result<()> {
        let path = self.game_path(&session.id);
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| error::serialization_error(e.to_string()))?;
        std::fs::write(&path, json)
            .map_err(|e| error::io_error(format!("Failed to write {}: {}", path.display(), e)))?;
        Ok(())
    }

    fn load(&self, game_id: &str) -> Result<GameSession> {
        let path = self.game_path(game_id);

        let json = std::fs::read_to_string(&path)
            .map_err(|e| error::session_not_found(game_id).with_operation("store::load").set_source(e))?;

        let session: GameSession = serde_json::from_str(&json).map_err(|e| {
            error::corrupt_state(format!("Failed to parse game {}: {}", game_id, e))
                .with_operation("store::load")
        })?;

        Ok(session)
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut games = Vec::new();

        let entries = std::fs::read_dir(&self.base_path)
            .map_err(|e| error::io_error(format!("Failed to read games dir: {}", e)))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().map(|ext| ext == "json").unwrap_or(false) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    if stem.starts_with("game_") {
                        games.push(stem.to_string());
                    }
                }
            }
        }

        Ok(games)
    }

    fn delete(&self, game_id: &str) -> Result<()> {
        let path = self.game_path(game_id);
        if path.exists() {
            std::fs::remove_file(&path).map_err(|e| {
                error::io_error(format!("Failed to delete game {}: {}", game_id, e))
            })?;
        }
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "file"
    }
}

// =============================================================================
// In-Memory Store (for testing)
// =============================================================================

/// In-memory session store (useful for testing)
pub struct MemoryStore {
    games: RwLock<HashMap<String, GameSession>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            games: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemoryStore {
    fn save(&self, session: &GameSession) -> Result<()> {
        let mut games = self.games.write().unwrap();
        games.insert(session.id.clone(), session.clone());
        Ok(())
    }

    fn load(&self, game_id: &str) -> Result<GameSession> {
        let games = self.games.read().unwrap();
        games
            .get(game_id)
            .cloned()
            .ok_or_else(|| error::session_not_found(game_id).with_operation("store::load"))
    }

    fn list(&self) -> Result<Vec<String>> {
        let games = self.games.read().unwrap();
        Ok(games.keys().cloned().collect())
    }

    fn delete(&self, game_id: &str) -> Result<()> {
        let mut games = self.games.write().unwrap();
        games.remove(game_id);
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}

// =============================================================================
// SessionManager (facade with pluggable store)
// =============================================================================

/// Manages game persistence with pluggable stores and exposes the atomic
/// "load, validate, mutate, persist" move application.
pub struct SessionManager {
    store: Box<dyn SessionStore>,
}

impl SessionManager {
    /// Create a session manager with the given store
    pub fn with_store(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Create a session manager with a file store (default)
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let store = FileStore::new(base_path)?;
        Ok(Self::with_store(store))
    }

    /// Create a session manager with an in-memory store
    pub fn in_memory() -> Self {
        Self::with_store(MemoryStore::new())
    }

    /// Get the store name
    pub fn store_name(&self) -> &'static str {
        self.store.store_name()
    }

    /// Create a new game with an empty board, persist it, return its id
    pub fn create_game(&self, size: usize) -> Result<String> {
        let session = GameSession::new(size)?;
        self.store.save(&session)?;
        Ok(session.id)
    }

    /// Load a game by id
    pub fn load_game(&self, game_id: &str) -> Result<GameSession> {
        self.store.load(game_id)
    }

    /// Apply one validated move: reload from the store, mutate, re-detect
    /// terminality, persist. Validation failures leave the persisted state
    /// untouched.
    pub fn apply_move(
        &self,
        game_id: &str,
        player: u8,
        position: (usize, usize),
    ) -> Result<MoveOutcome> {
        let mut session = self.store.load(game_id)?;
        let outcome = session.apply(player, position)?;
        self.store.save(&session)?;
        Ok(outcome)
    }

    /// List persisted game ids
    pub fn list_games(&self) -> Result<Vec<String>> {
        self.store.list()
    }

    /// Delete a persisted game
    pub fn delete_game(&self, game_id: &str) -> Result<()> {
        self.store.delete(game_id)
    }

    /// Check if a game exists
    pub fn game_exists(&self, game_id: &str) -> bool {
        self.store.exists(game_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_create_game() {
        let manager = SessionManager::in_memory();
        let id = manager.create_game(3).unwrap();

        let session = manager.load_game(&id).unwrap();
        assert_eq!(session.size, 3);
        assert!(!session.terminal);
        assert!(session.winner.is_none());
        assert!(session.move_history.is_empty());
        assert_eq!(session.expected_player(), 1);
    }

    #[test]
    fn test_create_game_invalid_size() {
        let manager = SessionManager::in_memory();
        let err = manager.create_game(0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_unique_ids_under_rapid_creation() {
        let manager = SessionManager::in_memory();
        let mut ids: Vec<String> = (0..64).map(|_| manager.create_game(3).unwrap()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 64);
    }

    #[test]
    fn test_apply_move_records_history() {
        let manager = SessionManager::in_memory();
        let id = manager.create_game(3).unwrap();

        let outcome = manager.apply_move(&id, 1, (0, 0)).unwrap();
        assert!(!outcome.terminal);
        assert_eq!(outcome.winner, None);

        let session = manager.load_game(&id).unwrap();
        assert_eq!(session.move_history.len(), 1);
        assert_eq!(session.move_history[0].player, 1);
        assert_eq!(session.move_history[0].position, [0, 0]);
        assert_eq!(session.move_history[0].mark, Mark::X);
        assert_eq!(session.board.occupied_cells(), 1);
        assert_eq!(session.expected_player(), 2);
    }

    #[test]
    fn test_move_validation_errors() {
        let manager = SessionManager::in_memory();
        let id = manager.create_game(3).unwrap();

        let err = manager.apply_move(&id, 1, (3, 0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPosition);

        manager.apply_move(&id, 1, (0, 0)).unwrap();
        let err = manager.apply_move(&id, 2, (0, 0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CellOccupied);

        let err = manager.apply_move(&id, 3, (1, 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPlayer);

        let err = manager.apply_move(&id, 1, (1, 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfTurn);
    }

    #[test]
    fn test_failed_move_leaves_persisted_state_untouched() {
        let manager = SessionManager::in_memory();
        let id = manager.create_game(3).unwrap();
        manager.apply_move(&id, 1, (0, 0)).unwrap();

        manager.apply_move(&id, 2, (0, 0)).unwrap_err();

        let session = manager.load_game(&id).unwrap();
        assert_eq!(session.move_history.len(), 1);
        assert_eq!(session.board.get(0, 0), Some(Mark::X));
    }

    #[test]
    fn test_straight_win_scenario() {
        // 3x3, top row for player 1
        let manager = SessionManager::in_memory();
        let id = manager.create_game(3).unwrap();

        let moves = [(1, (0, 0)), (2, (1, 0)), (1, (0, 1)), (2, (1, 1))];
        for (player, position) in moves {
            let outcome = manager.apply_move(&id, player, position).unwrap();
            assert!(!outcome.terminal);
        }

        let outcome = manager.apply_move(&id, 1, (0, 2)).unwrap();
        assert!(outcome.terminal);
        assert_eq!(outcome.winner, Some(1));

        let session = manager.load_game(&id).unwrap();
        assert!(session.terminal);
        assert_eq!(session.winner, Some(Mark::X));
        assert_eq!(session.move_history.len(), 5);
    }

    #[test]
    fn test_move_after_terminal_rejected() {
        let manager = SessionManager::in_memory();
        let id = manager.create_game(3).unwrap();
        for (player, position) in [
            (1, (0, 0)),
            (2, (1, 0)),
            (1, (0, 1)),
            (2, (1, 1)),
            (1, (0, 2)),
        ] {
            manager.apply_move(&id, player, position).unwrap();
        }

        let err = manager.apply_move(&id, 2, (2, 2)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GameOver);
    }

    #[test]
    fn test_draw_sets_terminal_without_winner() {
        let manager = SessionManager::in_memory();
        let id = manager.create_game(3).unwrap();

        // Fills the board with no three-in-a-row for either mark
        let moves = [
            (1, (0, 0)),
            (2, (0, 1)),
            (1, (0, 2)),
            (2, (1, 1)),
            (1, (1, 0)),
            (2, (1, 2)),
            (1, (2, 1)),
            (2, (2, 0)),
        ];
        for (player, position) in moves {
            let outcome = manager.apply_move(&id, player, position).unwrap();
            assert!(!outcome.terminal);
        }

        let outcome = manager.apply_move(&id, 1, (2, 2)).unwrap();
        assert!(outcome.terminal);
        assert_eq!(outcome.winner, None);

        let session = manager.load_game(&id).unwrap();
        assert!(session.terminal);
        assert!(session.winner.is_none());
        assert!(session.board.is_full());
    }

    #[test]
    fn test_turn_alternation_in_history() {
        let manager = SessionManager::in_memory();
        let id = manager.create_game(3).unwrap();
        for (player, position) in [
            (1, (0, 0)),
            (2, (1, 0)),
            (1, (0, 1)),
            (2, (1, 1)),
            (1, (0, 2)),
        ] {
            manager.apply_move(&id, player, position).unwrap();
        }

        let session = manager.load_game(&id).unwrap();
        for (i, record) in session.move_history.iter().enumerate() {
            assert_eq!(record.player, (i % 2) as u8 + 1);
        }
        assert_eq!(session.move_history.len(), session.board.occupied_cells());
    }

    #[test]
    fn test_load_missing_game() {
        let manager = SessionManager::in_memory();
        let err = manager.load_game("game_nope").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SessionNotFound);
    }

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SessionManager::new(temp_dir.path()).unwrap();
        assert_eq!(manager.store_name(), "file");

        let id = manager.create_game(3).unwrap();
        manager.apply_move(&id, 1, (1, 1)).unwrap();

        // Idempotence: load, apply nothing, reload - identical state
        let first = manager.load_game(&id).unwrap();
        let second = manager.load_game(&id).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.board.get(1, 1), Some(Mark::X));

        assert!(manager.game_exists(&id));
        assert!(manager.list_games().unwrap().contains(&id));

        manager.delete_game(&id).unwrap();
        assert!(!manager.game_exists(&id));
    }

    #[test]
    fn test_file_store_corrupt_state() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SessionManager::new(temp_dir.path()).unwrap();

        std::fs::write(temp_dir.path().join("game_bad.json"), "{not json").unwrap();
        let err = manager.load_game("game_bad").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptState);
    }

    #[test]
    fn test_persisted_wire_shape() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SessionManager::new(temp_dir.path()).unwrap();
        let id = manager.create_game(3).unwrap();
        manager.apply_move(&id, 1, (0, 0)).unwrap();

        let json = std::fs::read_to_string(temp_dir.path().join(format!("{}.json", id))).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["id"], serde_json::json!(id));
        assert_eq!(value["size"], serde_json::json!(3));
        assert_eq!(value["board"][0][0], serde_json::json!("X"));
        assert_eq!(value["board"][0][1], serde_json::json!(""));
        assert_eq!(value["terminal"], serde_json::json!(false));
        assert_eq!(value["winner"], serde_json::Value::Null);
        assert_eq!(
            value["move_history"][0],
            serde_json::json!({"player": 1, "position": [0, 0], "mark": "X"})
        );
    }
}
