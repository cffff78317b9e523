//! Principal-variation search with time-boxed iterative deepening

use std::time::{Duration, Instant};

use tracing::debug;

use crate::board::Cell;
use crate::config::SearchConfig;
use crate::eval::evaluate;
use crate::game::GameState;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Score bound wider than any evaluation
pub const INF: i32 = 1_000_000;

/// Depth increment between iterations. Even, so every iteration ends on the
/// same side to move.
const DEPTH_STEP: u32 = 2;

// ============================================================================
// MOVE ORDERING
// ============================================================================

/// A successor of a searched node
#[derive(Clone, Debug)]
struct Child {
    cell: Cell,
    state: GameState,
    score: i32,
}

/// Successors ordered best-first by static evaluation. The sort is stable,
/// so ties keep row-major order.
fn ordered_children(state: &GameState) -> Vec<Child> {
    let mut children: Vec<Child> = state
        .children()
        .map(|(cell, child)| {
            let score = evaluate(&child);
            Child {
                cell,
                state: child,
                score,
            }
        })
        .collect();
    children.sort_by(|a, b| b.score.cmp(&a.score));
    children
}

/// Leaf value for the side to move; `evaluate` scores for the last mover
fn leaf_score(state: &GameState) -> i32 {
    -evaluate(state)
}

// ============================================================================
// SEARCHER
// ============================================================================

/// Marker for a search cut short by the deadline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Aborted;

struct Searcher {
    deadline: Option<Instant>,
    nodes: u64,
}

impl Searcher {
    fn new(deadline: Option<Instant>) -> Self {
        Self { deadline, nodes: 0 }
    }

    #[inline]
    fn check_time(&self) -> Result<(), Aborted> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Aborted),
            _ => Ok(()),
        }
    }

    /// Negamax PVS. Returns the score for the side to move at `state`.
    fn pvs(&mut self, state: &GameState, depth: u32, mut alpha: i32, beta: i32) -> Result<i32, Aborted> {
        self.check_time()?;
        self.nodes += 1;

        if depth == 0 || state.is_terminal() {
            return Ok(leaf_score(state));
        }

        let children = ordered_children(state);
        if children.is_empty() {
            return Ok(leaf_score(state));
        }

        for (i, child) in children.iter().enumerate() {
            let score = if i == 0 {
                -self.pvs(&child.state, depth - 1, -beta, -alpha)?
            } else {
                // Null-window probe, re-search only if it beats alpha
                let probe = -self.pvs(&child.state, depth - 1, -alpha - 1, -alpha)?;
                if alpha < probe && probe < beta {
                    -self.pvs(&child.state, depth - 1, -beta, -alpha)?
                } else {
                    probe
                }
            };

            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        Ok(alpha)
    }

    /// Exact score of every root child at `depth`, from the root mover's
    /// view. Nothing is written back unless the whole iteration finishes.
    fn search_root(&mut self, root: &mut [Child], depth: u32) -> Result<(), Aborted> {
        let scores = root
            .iter()
            .map(|child| self.pvs(&child.state, depth, -INF, INF).map(|s| -s))
            .collect::<Result<Vec<_>, _>>()?;

        for (child, score) in root.iter_mut().zip(scores) {
            child.score = score;
        }
        root.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(())
    }
}

// ============================================================================
// PUBLIC SEARCH API
// ============================================================================

/// Outcome of one iterative-deepening search
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// Cell to play
    pub best_move: Cell,
    /// Score of that move for the player making it
    pub score: i32,
    /// Deepest completed iteration (0 = static ordering only)
    pub depth: u32,
    /// Nodes visited across all iterations
    pub nodes: u64,
    /// Whether the deadline cut an iteration short
    pub timed_out: bool,
}

/// Pick a move for the side to move. `None` if the game is over or no
/// legal move exists.
pub fn search(state: &GameState, config: &SearchConfig) -> Option<SearchResult> {
    if state.is_terminal() {
        return None;
    }

    let start = Instant::now();
    let deadline = start.checked_add(config.time_budget);

    let mut root = ordered_children(state);
    let first = root.first()?;

    let mut result = SearchResult {
        best_move: first.cell,
        score: first.score,
        depth: 0,
        nodes: 0,
        timed_out: false,
    };

    let mut searcher = Searcher::new(deadline);
    let mut depth = 1;

    while depth <= config.max_depth {
        match searcher.search_root(&mut root, depth) {
            Ok(()) => {
                let best = &root[0];
                result.best_move = best.cell;
                result.score = best.score;
                result.depth = depth;

                debug!(
                    depth,
                    best = %best.cell,
                    score = best.score,
                    nodes = searcher.nodes,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "iteration complete"
                );
            }
            Err(Aborted) => {
                debug!(
                    depth,
                    kept_depth = result.depth,
                    "deadline reached, discarding iteration"
                );
                result.timed_out = true;
                break;
            }
        }
        depth = match depth.checked_add(DEPTH_STEP) {
            Some(next) => next,
            None => break,
        };
    }

    result.nodes = searcher.nodes;
    Some(result)
}

/// Best cell within a time budget and depth cap
pub fn best_move(state: &GameState, time_budget: Duration, max_depth: u32) -> Option<Cell> {
    search(state, &SearchConfig::new(time_budget, max_depth)).map(|r| r.best_move)
}

/// Untimed PVS score for the side to move at `state`
pub fn pvs(state: &GameState, depth: u32, alpha: i32, beta: i32) -> i32 {
    match Searcher::new(None).pvs(state, depth, alpha, beta) {
        Ok(score) => score,
        // Without a deadline the search always completes
        Err(Aborted) => leaf_score(state),
    }
}

/// Plain full-width negamax, the reference PVS must agree with
pub fn negamax(state: &GameState, depth: u32) -> i32 {
    if depth == 0 || state.is_terminal() {
        return leaf_score(state);
    }

    state
        .children()
        .map(|(_, child)| -negamax(&child, depth - 1))
        .max()
        .unwrap_or_else(|| leaf_score(state))
}

// ============================================================================
// PVS AI
// ============================================================================

/// Machine player driven by [`search`]
#[derive(Clone, Debug, Default)]
pub struct PvsAI {
    pub config: SearchConfig,
}

impl PvsAI {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Full search result for current position
    pub fn search(&self, state: &GameState) -> Option<SearchResult> {
        search(state, &self.config)
    }

    /// Get best move for current position
    pub fn best_move(&self, state: &GameState) -> Option<Cell> {
        self.search(state).map(|r| r.best_move)
    }

    /// Play both sides until a win, a dead end or `max_plies` moves
    pub fn play_game(&self, initial: GameState, max_plies: usize) -> (GameState, Vec<Cell>) {
        let mut state = initial;
        let mut history = Vec::new();

        while !state.is_terminal() && history.len() < max_plies {
            let Some(cell) = self.best_move(&state) else {
                break;
            };
            match state.apply_move(cell) {
                Ok(next) => {
                    history.push(cell);
                    state = next;
                }
                Err(_) => break,
            }
        }

        (state, history)
    }
}

// ============================================================================
// TESTS
// ============================================================================
