//! Sequential trial execution with a cooldown between games.

use crate::summary::TrialSummary;
use llarena_core::error::{self, Result};
use llarena_core::{LlmProvider, Solver};
use std::time::Duration;

/// Configuration for one trial batch
#[derive(Debug, Clone)]
pub struct TrialConfig {
    /// Number of games to play
    pub n_trials: usize,
    /// Board size N for every game
    pub board_size: usize,
    /// Pause between consecutive games (not after the last one)
    pub cooldown: Duration,
    /// Print per-game progress
    pub verbose: bool,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            n_trials: 5,
            board_size: 3,
            cooldown: Duration::from_secs(10),
            verbose: false,
        }
    }
}

/// Runs `n_trials` games strictly one after another.
///
/// Games never overlap; the cooldown keeps a batch inside backend rate
/// limits. An infrastructure failure in any game aborts the whole batch -
/// partial batches would bias the aggregate, so the caller gets the error
/// instead of a truncated summary.
pub struct TrialRunner<P1, P2> {
    solver: Solver<P1, P2>,
    config: TrialConfig,
}

impl<P1, P2> std::fmt::Debug for TrialRunner<P1, P2> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrialRunner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<P1: LlmProvider, P2: LlmProvider> TrialRunner<P1, P2> {
    pub fn new(solver: Solver<P1, P2>, config: TrialConfig) -> Result<Self> {
        if config.n_trials == 0 {
            return Err(error::invalid_argument("n_trials must be at least 1")
                .with_operation("TrialRunner::new"));
        }
        Ok(Self { solver, config })
    }

    /// Play the whole batch and aggregate the outcomes
    pub async fn run(&self) -> Result<TrialSummary> {
        let mut outcomes = Vec::with_capacity(self.config.n_trials);

        for trial in 0..self.config.n_trials {
            if self.config.verbose {
                println!("Game {} of {}...", trial + 1, self.config.n_trials);
            }

            let outcome = self.solver.play_game(self.config.board_size).await?;
            if self.config.verbose {
                println!("Game {}: {}", trial + 1, outcome);
            }
            outcomes.push(outcome);

            if trial + 1 < self.config.n_trials && !self.config.cooldown.is_zero() {
                tokio::time::sleep(self.config.cooldown).await;
            }
        }

        Ok(TrialSummary::from_outcomes(outcomes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llarena_core::error::ErrorKind;
    use llarena_core::{GameOutcome, GenerationRequest, LlmResponse, SessionManager};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Test double that replays a fixed sequence of replies across games
    struct ScriptedProvider {
        replies: Mutex<VecDeque<String>>,
    }

    impl ScriptedProvider {
        fn new(replies: &[String]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().cloned().collect()),
            }
        }
    }

    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn default_model(&self) -> &str {
            "scripted"
        }

        fn initialize(&mut self, _api_key: &str) -> Result<()> {
            Ok(())
        }

        fn is_initialized(&self) -> bool {
            true
        }

        async fn generate(&self, _request: GenerationRequest) -> Result<LlmResponse> {
            let text = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| error::generation_failed("script exhausted"))?;
            Ok(LlmResponse {
                text,
                raw: serde_json::Value::Null,
                metadata: None,
            })
        }
    }

    fn reply(row: usize, col: usize) -> String {
        format!(r#"{{"move": {{"row": {}, "col": {}}}}}"#, row, col)
    }

    /// One game's worth of scripted replies where player 1 takes the top row
    fn p1_win_scripts(games: usize) -> (Vec<String>, Vec<String>) {
        let mut p1 = Vec::new();
        let mut p2 = Vec::new();
        for _ in 0..games {
            p1.extend([reply(0, 0), reply(0, 1), reply(0, 2)]);
            p2.extend([reply(1, 0), reply(1, 1)]);
        }
        (p1, p2)
    }

    fn runner(
        p1: &[String],
        p2: &[String],
        config: TrialConfig,
    ) -> TrialRunner<ScriptedProvider, ScriptedProvider> {
        let solver = Solver::new(
            ScriptedProvider::new(p1),
            ScriptedProvider::new(p2),
            SessionManager::in_memory(),
        );
        TrialRunner::new(solver, config).unwrap()
    }

    fn fast_config(n_trials: usize) -> TrialConfig {
        TrialConfig {
            n_trials,
            board_size: 3,
            cooldown: Duration::ZERO,
            verbose: false,
        }
    }

    #[test]
    fn test_default_config() {
        let config = TrialConfig::default();
        assert_eq!(config.n_trials, 5);
        assert_eq!(config.board_size, 3);
        assert_eq!(config.cooldown, Duration::from_secs(10));
    }

    #[test]
    fn test_zero_trials_rejected() {
        let solver = Solver::new(
            ScriptedProvider::new(&[]),
            ScriptedProvider::new(&[]),
            SessionManager::in_memory(),
        );
        let err = TrialRunner::new(solver, fast_config(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_batch_aggregates_in_play_order() {
        let (p1, p2) = p1_win_scripts(3);
        let runner = runner(&p1, &p2, fast_config(3));

        let summary = runner.run().await.unwrap();
        assert_eq!(summary.total_games, 3);
        assert_eq!(summary.player1_wins, 3);
        assert_eq!(summary.player2_wins, 0);
        assert_eq!(summary.draws, 0);
        assert_eq!(summary.outcomes, vec![GameOutcome::Win(1); 3]);
    }

    #[tokio::test]
    async fn test_each_game_gets_a_fresh_board() {
        // If state leaked between games, the second game's (0, 0) would be
        // occupied and player 1 would forfeit instead of winning
        let (p1, p2) = p1_win_scripts(2);
        let runner = runner(&p1, &p2, fast_config(2));

        let summary = runner.run().await.unwrap();
        assert_eq!(summary.outcomes, vec![GameOutcome::Win(1); 2]);
    }

    #[tokio::test]
    async fn test_forfeits_count_in_the_aggregate() {
        // First game: player 1 wins. Second game: player 1 babbles and
        // forfeits to player 2.
        let (mut p1, p2) = p1_win_scripts(1);
        p1.push("hmm, center looks good".to_string());
        let runner = runner(&p1, &p2, fast_config(2));

        let summary = runner.run().await.unwrap();
        assert_eq!(summary.player1_wins, 1);
        assert_eq!(summary.player2_wins, 1);
        assert_eq!(
            summary.outcomes,
            vec![GameOutcome::Win(1), GameOutcome::Win(2)]
        );
    }

    #[tokio::test]
    async fn test_infrastructure_failure_aborts_batch() {
        // Scripts cover one game only; the second game's first generate fails
        let (p1, p2) = p1_win_scripts(1);
        let runner = runner(&p1, &p2, fast_config(2));

        let err = runner.run().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GenerationFailed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown_between_games_but_not_after_last() {
        let (p1, p2) = p1_win_scripts(2);
        let runner = runner(
            &p1,
            &p2,
            TrialConfig {
                cooldown: Duration::from_secs(10),
                ..fast_config(2)
            },
        );

        let start = tokio::time::Instant::now();
        runner.run().await.unwrap();
        // One sleep between the two games, none after the second
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }
}
