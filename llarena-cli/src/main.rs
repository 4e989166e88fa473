//! # llarena CLI
//!
//! Command-line interface for running LLM-vs-LLM tic-tac-toe trials.
//!
//! Usage:
//!   llarena run
//!   llarena run --trials 20 --cooldown-secs 5
//!   llarena play --board-size 4
//!   llarena sessions
//!
//! Requires the GEMINI_API_KEY environment variable for the default backend.

use clap::{Parser, Subcommand};
use llarena_core::{LlmProvider, Provider, SessionManager, Solver, SolverConfig};
use llarena_trials::{TrialConfig, TrialRunner, TrialSummary};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "llarena")]
#[command(author, version, about = "llarena - LLM game arena")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory for game files and trial summaries
    #[arg(short, long, global = true, default_value = "output")]
    output_dir: PathBuf,

    /// Show per-move progress
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a batch of trials and write a summary
    Run {
        /// Number of games to play
        #[arg(short, long, default_value = "5")]
        trials: usize,

        /// Board size N (games are N by N)
        #[arg(short, long, default_value = "3")]
        board_size: usize,

        /// Seconds to wait between consecutive games
        #[arg(short, long, default_value = "10")]
        cooldown_secs: u64,

        /// Backend provider name
        #[arg(short, long, default_value = "gemini")]
        provider: String,

        /// Model override for both players
        #[arg(short, long)]
        model: Option<String>,

        /// Base name for the summary files ({name}.json, {name}.txt)
        #[arg(short, long, default_value = "trials")]
        name: String,
    },
    /// Play a single game and print the outcome
    Play {
        /// Board size N (games are N by N)
        #[arg(short, long, default_value = "3")]
        board_size: usize,

        /// Backend provider name
        #[arg(short, long, default_value = "gemini")]
        provider: String,

        /// Model override for both players
        #[arg(short, long)]
        model: Option<String>,
    },
    /// List persisted games
    Sessions,
}

fn api_key() -> String {
    match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.is_empty() => key,
        _ => {
            eprintln!("Error: GEMINI_API_KEY environment variable not set");
            std::process::exit(1);
        }
    }
}

/// Build one initialized provider; each player gets its own client
fn build_player(provider_name: &str, key: &str) -> Provider {
    let mut provider = match Provider::from_name(provider_name) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = provider.initialize(key) {
        eprintln!("Failed to initialize provider: {}", e);
        std::process::exit(1);
    }
    provider
}

fn build_solver(
    provider_name: &str,
    model: Option<String>,
    output_dir: &Path,
    verbose: bool,
) -> Solver<Provider, Provider> {
    let key = api_key();
    let p1 = build_player(provider_name, &key);
    let p2 = build_player(provider_name, &key);

    let sessions = match SessionManager::new(output_dir.join("games")) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Failed to open games directory: {}", e);
            std::process::exit(1);
        }
    };

    Solver::new(p1, p2, sessions).with_config(SolverConfig {
        model,
        verbose,
        ..SolverConfig::default()
    })
}

#[allow(clippy::too_many_arguments)]
async fn run_trials(
    trials: usize,
    board_size: usize,
    cooldown_secs: u64,
    provider: &str,
    model: Option<String>,
    name: &str,
    output_dir: &Path,
    verbose: bool,
) {
    let solver = build_solver(provider, model, output_dir, verbose);

    let config = TrialConfig {
        n_trials: trials,
        board_size,
        cooldown: Duration::from_secs(cooldown_secs),
        verbose: true,
    };

    let runner = match TrialRunner::new(solver, config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "Running {} game(s) of {}x{} tic-tac-toe via {}...\n",
        trials, board_size, board_size, provider
    );

    let summary = match runner.run().await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Trial batch failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("\n{}", summary.render_text());
    write_summary(&summary, output_dir, name);
}

fn write_summary(summary: &TrialSummary, output_dir: &Path, name: &str) {
    if let Err(e) = std::fs::create_dir_all(output_dir) {
        eprintln!("Failed to create {}: {}", output_dir.display(), e);
        std::process::exit(1);
    }

    let json_path = output_dir.join(format!("{}.json", name));
    let text_path = output_dir.join(format!("{}.txt", name));

    if let Err(e) = summary.write_json(&json_path) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    if let Err(e) = summary.write_text(&text_path) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    println!("Summary written to {}", json_path.display());
    println!("Report written to {}", text_path.display());
}

async fn play_one(board_size: usize, provider: &str, model: Option<String>, output_dir: &Path) {
    // A single game is always worth narrating
    let solver = build_solver(provider, model, output_dir, true);

    match solver.play_game(board_size).await {
        Ok(outcome) => println!("\nResult: {}", outcome),
        Err(e) => {
            eprintln!("Game failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn list_sessions(output_dir: &Path) {
    let manager = match SessionManager::new(output_dir.join("games")) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Failed to open games directory: {}", e);
            std::process::exit(1);
        }
    };

    match manager.list_games() {
        Ok(games) if games.is_empty() => println!("(no games found)"),
        Ok(mut games) => {
            games.sort();
            println!("Games in {}:", output_dir.join("games").display());
            for id in games {
                match manager.load_game(&id) {
                    Ok(session) => {
                        let state = if session.terminal {
                            match session.winner {
                                Some(mark) => format!("finished, {} wins", mark),
                                None => "finished, draw".to_string(),
                            }
                        } else {
                            format!("in progress, {} moves", session.move_history.len())
                        };
                        println!("  - {} ({}x{}, {})", id, session.size, session.size, state);
                    }
                    Err(e) => println!("  - {} (unreadable: {})", id, e),
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            trials,
            board_size,
            cooldown_secs,
            provider,
            model,
            name,
        } => {
            run_trials(
                trials,
                board_size,
                cooldown_secs,
                &provider,
                model,
                &name,
                &cli.output_dir,
                cli.verbose,
            )
            .await;
        }
        Commands::Play {
            board_size,
            provider,
            model,
        } => {
            play_one(board_size, &provider, model, &cli.output_dir).await;
        }
        Commands::Sessions => {
            list_sessions(&cli.output_dir);
        }
    }
}
