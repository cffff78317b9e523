//! Play command - machine-vs-machine game
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_opening(), play_game(), report_game()
//! - Level 3: random_move()
//! - Level 4: rng and formatting utilities

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use havannah_core::{Cell, GameResult, GameState, PvsAI, SearchConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Search time per move in milliseconds
    #[arg(long, default_value = "3000")]
    pub budget_ms: u64,

    /// Deepest iterative-deepening iteration
    #[arg(long, default_value = "20")]
    pub max_depth: u32,

    /// Stop the game after this many plies
    #[arg(long, default_value = "271")]
    pub max_plies: usize,

    /// Random legal moves played before the engine takes over
    #[arg(long, default_value = "0")]
    pub random_plies: usize,

    /// Output the game record as JSON
    #[arg(long)]
    pub json: bool,
}

/// One finished game
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    result: GameResult,
    plies: usize,
    random_plies: usize,
    moves: Vec<Cell>,
    #[serde(skip)]
    final_state: GameState,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// This function reads like a table of contents:
/// 1. Play a (possibly random) opening
/// 2. Let the engine play both sides
/// 3. Report the game
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let config = SearchConfig::new(Duration::from_millis(args.budget_ms), args.max_depth);

    tracing::info!(
        "Starting game: budget={}ms, max_depth={}, random_plies={}",
        args.budget_ms,
        args.max_depth,
        args.random_plies
    );

    let mut rng = create_rng(seed);
    let (state, opening) = play_opening(args.random_plies.min(args.max_plies), &mut rng)?;
    let record = play_game(state, opening, &config, &args)?;

    report_game(&record, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play `plies` uniformly random legal moves from the empty board
fn play_opening(plies: usize, rng: &mut ChaCha8Rng) -> Result<(GameState, Vec<Cell>)> {
    let mut state = GameState::new();
    let mut moves = Vec::with_capacity(plies);

    while moves.len() < plies && !state.is_terminal() {
        let Some(cell) = random_move(&state, rng) else {
            break;
        };
        state = state
            .apply_move(cell)
            .with_context(|| format!("random opening move {} rejected", cell))?;
        tracing::debug!("Opening move {}: {}", moves.len() + 1, cell);
        moves.push(cell);
    }

    Ok((state, moves))
}

/// Let the engine play both sides until the game ends
fn play_game(
    initial: GameState,
    opening: Vec<Cell>,
    config: &SearchConfig,
    args: &PlayArgs,
) -> Result<GameRecord> {
    let ai = PvsAI::new(config.clone());
    let random_plies = opening.len();
    let mut state = initial;
    let mut moves = opening;

    while !state.is_terminal() && moves.len() < args.max_plies {
        let Some(result) = ai.search(&state) else {
            tracing::info!("No legal moves left");
            break;
        };

        state = state
            .apply_move(result.best_move)
            .with_context(|| format!("engine move {} rejected", result.best_move))?;
        moves.push(result.best_move);

        tracing::info!(
            "Ply {}: {:?} plays {} (score {}, depth {}, {} nodes{})",
            moves.len(),
            state.mover(),
            result.best_move,
            result.score,
            result.depth,
            result.nodes,
            if result.timed_out { ", timed out" } else { "" }
        );
    }

    Ok(GameRecord {
        result: state.result(),
        plies: moves.len(),
        random_plies,
        moves,
        final_state: state,
    })
}

/// Report the finished game
fn report_game(record: &GameRecord, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(record).context("failed to encode game record")?;
        println!("{}", text);
    } else {
        print_text_record(record);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Uniformly random legal move
fn random_move(state: &GameState, rng: &mut ChaCha8Rng) -> Option<Cell> {
    state.legal_moves().choose(rng).copied()
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Print the game as text
fn print_text_record(record: &GameRecord) {
    println!("\n=== Game Over ===");
    println!("{}", record.final_state);
    println!("Result:       {}", describe_result(record.result));
    println!("Plies:        {}", record.plies);
    println!("Random plies: {}", record.random_plies);

    let moves: Vec<String> = record.moves.iter().map(Cell::to_string).collect();
    println!("Moves:        {}", moves.join(" "));
}

fn describe_result(result: GameResult) -> &'static str {
    match result {
        GameResult::PlayerOneWins => "player one (X) wins",
        GameResult::PlayerTwoWins => "player two (O) wins",
        GameResult::Ongoing => "unfinished",
    }
}

// ============================================================================
// TESTS
// ============================================================================
