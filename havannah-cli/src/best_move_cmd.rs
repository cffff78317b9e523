//! Best-move command - search one position
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_position(), report_search()
//! - Level 3: (delegated to havannah-core search)

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use havannah_core::{search, Cell, GameState, SearchConfig, SearchResult};

use crate::coords::parse_moves;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct BestMoveArgs {
    /// Moves played so far, e.g. "9,9 8,9 9,8"
    #[arg(long, default_value = "")]
    pub moves: String,

    /// Search time in milliseconds
    #[arg(long, default_value = "3000")]
    pub budget_ms: u64,

    /// Deepest iterative-deepening iteration
    #[arg(long, default_value = "20")]
    pub max_depth: u32,

    /// Output the result as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run best-move command
pub fn run(args: BestMoveArgs) -> Result<()> {
    let state = load_position(&args.moves)?;

    if let Some(winner) = state.winner() {
        println!("Game already won by {:?}", winner);
        return Ok(());
    }

    let config = SearchConfig::new(Duration::from_millis(args.budget_ms), args.max_depth);
    let result = search(&state, &config);

    report_search(&state, result, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Replay the move list into a position
fn load_position(moves: &str) -> Result<GameState> {
    let cells = parse_moves(moves).context("failed to parse move list")?;

    let state = GameState::from_moves(&cells).context("move list is not a legal game")?;

    tracing::info!(
        "Loaded position at round {}, {:?} to move, {} legal moves",
        state.round(),
        state.current_player(),
        state.legal_moves().len()
    );

    Ok(state)
}

/// Print the search outcome
fn report_search(state: &GameState, result: Option<SearchResult>, json: bool) -> Result<()> {
    let Some(result) = result else {
        println!("No legal moves");
        return Ok(());
    };

    if json {
        #[derive(Serialize)]
        struct JsonOutput {
            best_move: Cell,
            score: i32,
            depth: u32,
            nodes: u64,
            timed_out: bool,
        }

        let output = JsonOutput {
            best_move: result.best_move,
            score: result.score,
            depth: result.depth,
            nodes: result.nodes,
            timed_out: result.timed_out,
        };
        let text = serde_json::to_string_pretty(&output).context("failed to encode result")?;
        println!("{}", text);
    } else {
        println!("{}", state);
        println!(
            "{:?} plays {} (score {}, depth {}, {} nodes{})",
            state.current_player(),
            result.best_move,
            result.score,
            result.depth,
            result.nodes,
            if result.timed_out { ", timed out" } else { "" }
        );
    }

    Ok(())
}
