//! Aggregation and reporting of a finished trial batch.

use crate::binomial::BinomialComparison;
use llarena_core::error::{self, Result};
use llarena_core::GameOutcome;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Aggregated results of one trial batch.
///
/// Serialized shape: counts plus the raw outcome list in play order, each
/// outcome as 0 (draw), 1, or 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialSummary {
    pub total_games: usize,
    pub player1_wins: usize,
    pub player2_wins: usize,
    pub draws: usize,
    pub outcomes: Vec<GameOutcome>,
}

impl TrialSummary {
    /// Aggregate a list of outcomes in play order
    pub fn from_outcomes(outcomes: Vec<GameOutcome>) -> Self {
        let player1_wins = outcomes.iter().filter(|o| **o == GameOutcome::Win(1)).count();
        let player2_wins = outcomes.iter().filter(|o| **o == GameOutcome::Win(2)).count();
        let draws = outcomes.iter().filter(|o| **o == GameOutcome::Draw).count();

        Self {
            total_games: outcomes.len(),
            player1_wins,
            player2_wins,
            draws,
            outcomes,
        }
    }

    /// The fairness comparison over this batch, if any game was decisive
    pub fn comparison(&self) -> Option<BinomialComparison> {
        BinomialComparison::against_fair_coin(&self.outcomes)
    }

    /// Write the machine-readable summary as pretty-printed JSON
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| error::serialization_error(e.to_string()))?;
        std::fs::write(path, json)
            .map_err(|e| error::io_error(format!("Failed to write {}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Write the human-readable report
    pub fn write_text(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.render_text())
            .map_err(|e| error::io_error(format!("Failed to write {}: {}", path.display(), e)))?;
        Ok(())
    }

    /// The text report body
    pub fn render_text(&self) -> String {
        let ints: Vec<String> = self
            .outcomes
            .iter()
            .map(|o| o.as_int().to_string())
            .collect();

        let mut text = format!(
            "Total games played: {}\n\
             Player 1 wins: {}\n\
             Player 2 wins: {}\n\
             Draws: {}\n\
             \n\
             Detailed outcomes:\n\
             [{}]\n",
            self.total_games,
            self.player1_wins,
            self.player2_wins,
            self.draws,
            ints.join(", "),
        );

        match self.comparison() {
            Some(comparison) => {
                text.push('\n');
                text.push_str(&comparison.report());
            }
            None => text.push_str("\nNo decisive games; fairness comparison skipped.\n"),
        }

        text
    }
}
