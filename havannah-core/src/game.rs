//! Game state and move generation

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::board::{Cell, CENTER, COLUMN_RANGES, ROWS};
use crate::win;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player color. Player one (black) always opens in the center.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One = 1,
    Two = 2,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    fn symbol(self) -> char {
        match self {
            Player::One => 'X',
            Player::Two => 'O',
        }
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    PlayerOneWins,
    PlayerTwoWins,
}

/// Reasons a placement is rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("cell {0} is outside the board")]
    OutOfBounds(Cell),
    #[error("cell {0} is already occupied")]
    Occupied(Cell),
    #[error("cell {0} is not adjacent to two placed stones")]
    IllegalAdjacency(Cell),
}

/// Reasons an explicit position setup is rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("cell {0} is outside the board")]
    OutOfBounds(Cell),
    #[error("cell {0} is claimed by both players")]
    Overlap(Cell),
    #[error("player one has {one} stones and player two has {two}")]
    Unbalanced { one: usize, two: usize },
    #[error("last move {0} does not belong to the player who moved last")]
    LastMoveMismatch(Cell),
    #[error("a position with stones needs a last move")]
    MissingLastMove,
}

// ============================================================================
// GAME STATE
// ============================================================================

/// One ply of a game. Never mutated after construction: applying a move
/// yields a fresh state and leaves the parent intact.
#[derive(Clone, Debug)]
pub struct GameState {
    /// Board: cell -> owner (sparse representation)
    board: FxHashMap<Cell, Player>,

    player_one_count: usize,
    player_two_count: usize,

    /// Ply counter, 1 for the empty board
    round: u16,

    /// Player to move next
    current_player: Player,

    last_move: Option<Cell>,

    /// Cached legal targets, row-major
    legal_moves: Vec<Cell>,

    /// Cached win flag for the player who made `last_move`
    terminal: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Empty board, player one to move
    pub fn new() -> Self {
        Self {
            board: FxHashMap::default(),
            player_one_count: 0,
            player_two_count: 0,
            round: 1,
            current_player: Player::One,
            last_move: None,
            legal_moves: Vec::new(),
            terminal: false,
        }
        .settle()
    }

    /// Replay a sequence of placements from the empty board
    pub fn from_moves(moves: &[Cell]) -> Result<Self, MoveError> {
        moves
            .iter()
            .enumerate()
            .try_fold(Self::new(), |state, (ply, &cell)| {
                state.apply_move(cell).map_err(|err| {
                    trace!(ply = ply + 1, %cell, %err, "replay rejected move");
                    err
                })
            })
    }

    /// Build an arbitrary position without replaying it.
    ///
    /// Only structural invariants are checked (disjoint sets, stone counts,
    /// ownership of the last move); the bridge rule is not, so this can set
    /// up positions no legal game reaches.
    pub fn from_position(
        player_one: &[Cell],
        player_two: &[Cell],
        last_move: Option<Cell>,
    ) -> Result<Self, PositionError> {
        let mut board = FxHashMap::default();

        for (stones, owner) in [(player_one, Player::One), (player_two, Player::Two)] {
            for &cell in stones {
                if !cell.is_valid() {
                    return Err(PositionError::OutOfBounds(cell));
                }
                if board.insert(cell, owner).is_some() {
                    return Err(PositionError::Overlap(cell));
                }
            }
        }

        let one = player_one.len();
        let two = player_two.len();
        if one < two || one > two + 1 {
            return Err(PositionError::Unbalanced { one, two });
        }

        let current_player = if one == two { Player::One } else { Player::Two };
        let mover = current_player.opponent();
        match last_move {
            Some(cell) if board.get(&cell) != Some(&mover) => {
                return Err(PositionError::LastMoveMismatch(cell));
            }
            None if one + two > 0 => return Err(PositionError::MissingLastMove),
            _ => {}
        }

        Ok(Self {
            board,
            player_one_count: one,
            player_two_count: two,
            round: (one + two + 1) as u16,
            current_player,
            last_move,
            legal_moves: Vec::new(),
            terminal: false,
        }
        .settle())
    }

    /// Fill the cached fields
    fn settle(mut self) -> Self {
        self.legal_moves = self.compute_legal_moves();
        self.terminal = win::is_win(&self);
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn round(&self) -> u16 {
        self.round
    }

    /// Player to move next
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Player who placed `last_move`
    pub fn mover(&self) -> Option<Player> {
        self.last_move.map(|_| self.current_player.opponent())
    }

    pub fn last_move(&self) -> Option<Cell> {
        self.last_move
    }

    pub fn legal_moves(&self) -> &[Cell] {
        &self.legal_moves
    }

    pub fn is_legal(&self, cell: Cell) -> bool {
        self.legal_moves.binary_search(&cell).is_ok()
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Winner, if the last move completed a line or an enclosure
    pub fn winner(&self) -> Option<Player> {
        if self.terminal {
            self.mover()
        } else {
            None
        }
    }

    pub fn result(&self) -> GameResult {
        match self.winner() {
            Some(Player::One) => GameResult::PlayerOneWins,
            Some(Player::Two) => GameResult::PlayerTwoWins,
            None => GameResult::Ongoing,
        }
    }

    /// Owner of the stone on `cell`
    pub fn owner(&self, cell: Cell) -> Option<Player> {
        self.board.get(&cell).copied()
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.board.contains_key(&cell)
    }

    pub fn stone_count(&self, player: Player) -> usize {
        match player {
            Player::One => self.player_one_count,
            Player::Two => self.player_two_count,
        }
    }

    /// Stones of one player, in no particular order
    pub fn stones(&self, player: Player) -> impl Iterator<Item = Cell> + '_ {
        self.board
            .iter()
            .filter(move |&(_, &owner)| owner == player)
            .map(|(&cell, _)| cell)
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    fn compute_legal_moves(&self) -> Vec<Cell> {
        match self.round {
            1 => vec![CENTER],
            2 => {
                let mut moves: Vec<Cell> = self
                    .stones(Player::One)
                    .flat_map(|stone| stone.neighbors().iter().copied())
                    .filter(|cell| !self.is_occupied(*cell))
                    .collect();
                moves.sort_unstable();
                moves
            }
            _ => {
                // Bridge rule: an empty cell needs two stone neighbors
                let mut touches: FxHashMap<Cell, u8> = FxHashMap::default();
                for &stone in self.board.keys() {
                    for &n in stone.neighbors() {
                        if !self.is_occupied(n) {
                            *touches.entry(n).or_insert(0) += 1;
                        }
                    }
                }

                let mut moves: Vec<Cell> = touches
                    .into_iter()
                    .filter(|&(_, count)| count >= 2)
                    .map(|(cell, _)| cell)
                    .collect();
                moves.sort_unstable();
                moves
            }
        }
    }

    // ========================================================================
    // APPLY MOVE
    // ========================================================================

    /// Place a stone for the side to move, return the new state
    pub fn apply_move(&self, cell: Cell) -> Result<Self, MoveError> {
        if !cell.is_valid() {
            return Err(MoveError::OutOfBounds(cell));
        }
        if self.is_occupied(cell) {
            return Err(MoveError::Occupied(cell));
        }
        if !self.is_legal(cell) {
            return Err(MoveError::IllegalAdjacency(cell));
        }

        let mover = if self.player_one_count <= self.player_two_count {
            Player::One
        } else {
            Player::Two
        };

        let mut child = self.clone();
        child.board.insert(cell, mover);
        match mover {
            Player::One => child.player_one_count += 1,
            Player::Two => child.player_two_count += 1,
        }
        child.round += 1;
        child.current_player = self.current_player.opponent();
        child.last_move = Some(cell);

        Ok(child.settle())
    }

    /// Boundary form of [`GameState::apply_move`] taking raw coordinates
    pub fn apply_move_at(&self, row: i8, col: i8) -> Result<Self, MoveError> {
        self.apply_move(Cell::new(row, col))
    }

    /// Every legal successor, paired with the placed cell
    pub fn children(&self) -> impl Iterator<Item = (Cell, GameState)> + '_ {
        self.legal_moves
            .iter()
            .filter_map(move |&cell| self.apply_move(cell).ok().map(|child| (cell, child)))
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..ROWS {
            let (min, max) = COLUMN_RANGES[row as usize];
            // Odd rows sit half a cell to the right
            let mut line = String::new();
            if row % 2 == 1 {
                line.push(' ');
            }
            for col in 0..=18 {
                let c = if col < min || col > max {
                    ' '
                } else {
                    match self.owner(Cell::new(row, col)) {
                        Some(player) => player.symbol(),
                        None => '.',
                    }
                };
                line.push(c);
                line.push(' ');
            }
            writeln!(f, "{:2} {}", row, line.trim_end())?;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
