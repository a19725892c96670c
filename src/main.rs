//! Strictly Codenames - Unified CLI
//!
//! Terminal client and board inspection tool.

#![warn(missing_docs)]

mod cli;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use strictly_codenames::{
    BoardSnapshot, ClientConfig, Team, TurnController, WireBoard,
    invariants::{BoardInvariants, InvariantSet},
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            server_url,
            pacing_ms,
        } => run_play(config, server_url, pacing_ms).await,
        Command::Inspect { board } => run_inspect(board),
    }
}

/// Resolve configuration and run the terminal UI
async fn run_play(
    config: Option<PathBuf>,
    server_url: Option<String>,
    pacing_ms: Option<u64>,
) -> Result<()> {
    let mut config = ClientConfig::load(config.as_deref())
        .map_err(|e| anyhow::anyhow!(e))?
        .apply_env();
    if let Some(url) = server_url {
        config = config.with_server_url(url);
    }
    if let Some(pacing_ms) = pacing_ms {
        config = config.with_pacing_ms(pacing_ms);
    }

    tui::run_tui(config).await
}

/// Print a saved board, its controls and any invariant violations
#[instrument(skip_all, fields(path = %path.display()))]
fn run_inspect(path: PathBuf) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,strictly_codenames=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Inspecting board");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let board = BoardSnapshot::try_from(WireBoard::from_json(&json)?)?;

    let violations = BoardInvariants::check_all(&board).err().unwrap_or_default();
    let controller = TurnController::new(board);
    let board = controller.board();

    println!("{}", board.display());
    println!("Phase: {}", board.phase());
    if let Some(clue) = board.clue() {
        println!("Clue: {} ({})", clue.word, clue.target_count);
    }
    println!("Guesses left: {}", board.remaining_guesses());
    println!("Difficulty: {}", board.difficulty());
    for team in [Team::Blue, Team::Red, Team::Neutral, Team::Assassin] {
        println!(
            "{:<9} {} face down, {} unpicked",
            team,
            board.remaining().get(team),
            board.unpicked().get(team)
        );
    }
    if !board.issued_clues().is_empty() {
        println!("Issued clues: {}", board.issued_clues().join(", "));
    }
    println!("Controls: {:?}", controller.controls());
    if let Some(kind) = controller.awaiting() {
        println!("Next remote request: {}", kind);
    }
    for violation in &violations {
        println!("Invariant violated on load: {}", violation.description);
    }

    Ok(())
}
