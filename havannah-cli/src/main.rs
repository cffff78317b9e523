//! Havannah CLI - Command-line interface
//!
//! Commands:
//! - play: machine-vs-machine game
//! - best-move: engine reply for a position given as raw placements

mod best_move_cmd;
mod coords;
mod play_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "havannah")]
#[command(about = "Havannah-like hex engine with principal-variation search")]
struct Cli {
    /// Random seed for reproducible openings
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a machine-vs-machine game
    Play(play_cmd::PlayArgs),
    /// Search a position and print the engine's move
    BestMove(best_move_cmd::BestMoveArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::BestMove(args) => best_move_cmd::run(args),
    }
}
