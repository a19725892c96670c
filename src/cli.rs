//! Command-line interface for strictly_codenames.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Codenames - word-guessing game against a remote clue-giver
#[derive(Parser, Debug)]
#[command(name = "strictly_codenames")]
#[command(about = "Terminal client for a codenames-style game", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Deal a board from the remote and play it in the terminal UI
    Play {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Remote collaborator base URL (overrides config and environment)
        #[arg(long)]
        server_url: Option<String>,

        /// Delay between replayed opponent reveals, in milliseconds
        #[arg(long)]
        pacing_ms: Option<u64>,
    },

    /// Load a saved wire board and print its state
    Inspect {
        /// Path to a JSON wire board
        #[arg(short, long)]
        board: PathBuf,
    },
}
