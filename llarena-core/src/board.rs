//! # Board State
//!
//! The N-by-N grid and its win/draw queries. The board records marks and
//! answers questions; it knows nothing about turn order or persistence.
//!
//! A cell, once written, is never overwritten - `place` enforces this.

use crate::error::{self, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A player's mark on the board. Player 1 plays `X`, player 2 plays `O`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Map a player number to its mark. Fails with InvalidPlayer for
    /// anything outside {1, 2}.
    pub fn for_player(player: u8) -> Result<Mark> {
        match player {
            1 => Ok(Mark::X),
            2 => Ok(Mark::O),
            other => Err(error::invalid_player(other).with_operation("board::for_player")),
        }
    }

    /// The player number this mark belongs to
    pub fn player(&self) -> u8 {
        match self {
            Mark::X => 1,
            Mark::O => 2,
        }
    }

    /// The opposing mark
    pub fn opponent(&self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The N-by-N grid.
///
/// Serializes as a plain grid of `"" | "X" | "O"` strings so persisted games
/// keep the documented wire shape; the size is re-derived on load and ragged
/// or unknown-cell grids are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<String>>", into = "Vec<Vec<String>>")]
pub struct Board {
    size: usize,
    grid: Vec<Vec<Option<Mark>>>,
}

impl Board {
    /// Create an empty board. Fails with ConfigInvalid when `size < 1`.
    pub fn new(size: usize) -> Result<Self> {
        if size < 1 {
            return Err(error::config_invalid(format!(
                "board size must be at least 1, got {}",
                size
            ))
            .with_operation("board::new"));
        }
        Ok(Self {
            size,
            grid: vec![vec![None; size]; size],
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// The mark at a cell, or None when empty or out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<Mark> {
        self.grid.get(row)?.get(col).copied()?
    }

    /// Number of occupied cells. Always equals the move-history length of
    /// the owning session.
    pub fn occupied_cells(&self) -> usize {
        self.grid
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| cell.is_some())
            .count()
    }

    /// Write a mark into an empty in-bounds cell.
    ///
    /// Fails with InvalidPosition outside `[0, N)` and CellOccupied when the
    /// target already holds a mark; the grid is untouched on failure.
    pub fn place(&mut self, row: usize, col: usize, mark: Mark) -> Result<()> {
        if row >= self.size || col >= self.size {
            return Err(
                error::invalid_position(row, col, self.size).with_operation("board::place")
            );
        }
        if self.grid[row][col].is_some() {
            return Err(error::cell_occupied(row, col).with_operation("board::place"));
        }
        self.grid[row][col] = Some(mark);
        Ok(())
    }

    /// Find a winning mark, if any.
    ///
    /// Checks every row, then every column, then the main diagonal, then the
    /// anti-diagonal; a line wins when all N cells hold the same mark. With
    /// one mark per cell at most one mark can own a full line, so the fixed
    /// order only decides which identical result is found first.
    pub fn detect_winner(&self) -> Option<Mark> {
        for row in &self.grid {
            if let Some(mark) = uniform_line(row.iter().copied()) {
                return Some(mark);
            }
        }
        for col in 0..self.size {
            if let Some(mark) = uniform_line((0..self.size).map(|row| self.grid[row][col])) {
                return Some(mark);
            }
        }
        if let Some(mark) = uniform_line((0..self.size).map(|i| self.grid[i][i])) {
            return Some(mark);
        }
        uniform_line((0..self.size).map(|i| self.grid[i][self.size - 1 - i]))
    }

    /// True iff no cell is empty
    pub fn is_full(&self) -> bool {
        self.grid
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_some()))
    }
}

/// The mark uniformly filling a line, if the line is full and uniform
fn uniform_line(mut cells: impl Iterator<Item = Option<Mark>>) -> Option<Mark> {
    let first = cells.next()??;
    cells.all(|cell| cell == Some(first)).then_some(first)
}

// =============================================================================
// Wire representation: grid of "" | "X" | "O"
// =============================================================================

impl TryFrom<Vec<Vec<String>>> for Board {
    type Error = llarena_error::Error;

    fn try_from(rows: Vec<Vec<String>>) -> Result<Self> {
        let size = rows.len();
        if size < 1 {
            return Err(error::corrupt_state("persisted board is empty")
                .with_operation("board::deserialize"));
        }

        let mut grid = Vec::with_capacity(size);
        for row in &rows {
            if row.len() != size {
                return Err(error::corrupt_state(format!(
                    "persisted board is not square: row of {} cells in a {}-row grid",
                    row.len(),
                    size
                ))
                .with_operation("board::deserialize"));
            }
            let mut cells = Vec::with_capacity(size);
            for cell in row {
                cells.push(match cell.as_str() {
                    "" => None,
                    "X" => Some(Mark::X),
                    "O" => Some(Mark::O),
                    other => {
                        return Err(error::corrupt_state(format!(
                            "unknown cell value '{}'",
                            other
                        ))
                        .with_operation("board::deserialize"))
                    }
                });
            }
            grid.push(cells);
        }

        Ok(Self { size, grid })
    }
}

impl From<Board> for Vec<Vec<String>> {
    fn from(board: Board) -> Self {
        board
            .grid
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| cell.map(|m| m.as_str().to_string()).unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}

// =============================================================================
// Prompt layout: one row per line, cells joined with '|', empty cell blank
// =============================================================================

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.grid {
            write!(f, "|")?;
            for cell in row {
                match cell {
                    Some(mark) => write!(f, "{}|", mark)?,
                    None => write!(f, " |")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
