//! Win detection anchored at the last placed stone
//!
//! Two conditions end the game:
//! - five contiguous stones of the mover along one of the three hex axes
//! - an enclosure: a pocket holding at least one opponent stone from which
//!   no straight ray reaches the board edge without crossing a mover stone

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::board::{Cell, Direction, HexGrid, AXES};
use crate::game::{GameState, Player};

/// Stones in a row needed to win
pub const WIN_LENGTH: u32 = 5;

// ============================================================================
// LINES
// ============================================================================

/// Contiguous stones of `owner` beyond `origin` in one direction, at most 4
fn run_towards(state: &GameState, origin: Cell, direction: Direction, owner: Player) -> u32 {
    let mut count = 0;
    let mut current = origin;
    while count < WIN_LENGTH - 1 {
        current = current.step(direction);
        // Off-board cells have no owner, so this also stops at the edge
        if state.owner(current) != Some(owner) {
            break;
        }
        count += 1;
    }
    count
}

/// Length of the line through `origin` on one axis, capped at five
pub fn line_length(
    state: &GameState,
    origin: Cell,
    axis: (Direction, Direction),
    owner: Player,
) -> u32 {
    let (backward, forward) = axis;
    let total = 1 + run_towards(state, origin, backward, owner)
        + run_towards(state, origin, forward, owner);
    total.min(WIN_LENGTH)
}

/// Line lengths through the last move for the row, ascending and
/// descending axes. All zero on the empty board.
pub fn line_lengths(state: &GameState) -> [u32; 3] {
    let (Some(origin), Some(mover)) = (state.last_move(), state.mover()) else {
        return [0; 3];
    };
    AXES.map(|axis| line_length(state, origin, axis, mover))
}

pub fn is_line_win(state: &GameState) -> bool {
    line_lengths(state).iter().any(|&len| len >= WIN_LENGTH)
}

// ============================================================================
// ENCLOSURE
// ============================================================================

/// Whether `cell` has an unobstructed ray to the edge; only stones of
/// `blocker` obstruct
pub fn can_see_border(state: &GameState, cell: Cell, blocker: Player) -> bool {
    HexGrid::get().can_see_border(cell, |c| state.owner(c) == Some(blocker))
}

/// Flood outward from the last move through cells that cannot see the
/// border and report whether the sealed region holds an opponent stone.
pub fn is_enclosure_win(state: &GameState) -> bool {
    let (Some(seed), Some(mover)) = (state.last_move(), state.mover()) else {
        return false;
    };
    let opponent = mover.opponent();
    if state.stone_count(opponent) == 0 {
        return false;
    }

    let grid = HexGrid::get();
    let mut sight: FxHashMap<Cell, bool> = FxHashMap::default();
    let mut sees_border = |cell: Cell| {
        *sight
            .entry(cell)
            .or_insert_with(|| can_see_border(state, cell, mover))
    };

    let mut frontier = VecDeque::from([seed]);
    let mut queued: FxHashSet<Cell> = FxHashSet::from_iter([seed]);
    let mut visited: FxHashSet<Cell> = FxHashSet::default();

    while let Some(current) = frontier.pop_front() {
        let mut open = Vec::new();
        let mut candidates = Vec::new();

        for &n in grid.neighbors(current) {
            if state.owner(n) == Some(mover) {
                continue;
            }
            if sees_border(n) {
                open.push(n);
                continue;
            }
            if visited.contains(&n) {
                continue;
            }
            candidates.push(n);
        }

        // A candidate one hop from open space is not sealed
        candidates.retain(|c| !grid.neighbors(*c).iter().any(|n| open.contains(n)));

        for c in candidates {
            if queued.insert(c) {
                frontier.push_back(c);
            }
        }

        // The seed is the mover's own stone and never counts
        if current != seed && state.owner(current) == Some(opponent) {
            return true;
        }
        visited.insert(current);
    }

    false
}

/// Line or enclosure win for the player who made the last move
pub fn is_win(state: &GameState) -> bool {
    is_line_win(state) || is_enclosure_win(state)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(coords: &[(i8, i8)]) -> Vec<Cell> {
        coords.iter().map(|&(r, c)| Cell::new(r, c)).collect()
    }

    /// Player two ring around the center stone of player one, closed by `last`
    fn ring_position(ring: &[(i8, i8)], last: (i8, i8)) -> GameState {
        let one = cells(&[(9, 9), (16, 5), (16, 7), (16, 9), (16, 11), (16, 13)]);
        let two = cells(ring);
        GameState::from_position(&one, &two, Some(Cell::new(last.0, last.1))).unwrap()
    }

    const CENTER_RING: [(i8, i8); 6] = [(9, 8), (9, 10), (8, 9), (8, 10), (10, 9), (10, 10)];

    #[test]
    fn test_empty_board_has_no_win() {
        let game = GameState::new();
        assert_eq!(line_lengths(&game), [0, 0, 0]);
        assert!(!is_line_win(&game));
        assert!(!is_enclosure_win(&game));
    }

    #[test]
    fn test_horizontal_line_length() {
        let moves = cells(&[(9, 9), (8, 9), (9, 8), (8, 8), (9, 7), (8, 7), (9, 6)]);
        let game = GameState::from_moves(&moves).unwrap();
        assert_eq!(line_lengths(&game), [4, 1, 1]);
        assert!(!is_line_win(&game));
    }

    #[test]
    fn test_line_through_middle_counts_both_sides() {
        // Stone placed in the middle of a row run
        let one = cells(&[(9, 5), (9, 6), (9, 8), (9, 9), (2, 5)]);
        let two = cells(&[(8, 5), (8, 6), (8, 7), (8, 8)]);
        let before = GameState::from_position(&one, &two, Some(Cell::new(2, 5))).unwrap();
        assert!(!before.is_terminal());

        let mut two = two;
        two.push(Cell::new(9, 7));
        let blocked = GameState::from_position(&one, &two, Some(Cell::new(9, 7))).unwrap();
        assert_eq!(line_lengths(&blocked)[0], 1);

        let one = cells(&[(9, 5), (9, 6), (9, 7), (9, 8), (9, 9)]);
        let two = cells(&[(8, 5), (8, 6), (8, 7), (8, 8)]);
        let filled = GameState::from_position(&one, &two, Some(Cell::new(9, 7))).unwrap();
        assert_eq!(line_lengths(&filled)[0], 5);
        assert!(filled.is_terminal());
    }

    #[test]
    fn test_line_length_is_capped() {
        let one = cells(&[(9, 3), (9, 4), (9, 5), (9, 6), (9, 7), (9, 8), (9, 9)]);
        let two = cells(&[(2, 5), (2, 7), (2, 9), (2, 11), (2, 13), (16, 5)]);
        let game = GameState::from_position(&one, &two, Some(Cell::new(9, 6))).unwrap();
        assert_eq!(line_lengths(&game)[0], WIN_LENGTH);
    }

    #[test]
    fn test_line_stops_at_board_edge() {
        let one = cells(&[(9, 0), (9, 1), (9, 2)]);
        let two = cells(&[(2, 5), (2, 7)]);
        let game = GameState::from_position(&one, &two, Some(Cell::new(9, 0))).unwrap();
        assert_eq!(line_lengths(&game), [3, 1, 1]);
    }

    #[test]
    fn test_single_cell_enclosure() {
        let game = ring_position(&CENTER_RING, (10, 10));
        assert!(is_enclosure_win(&game));
        assert!(!is_line_win(&game));
        assert!(game.is_terminal());
        assert_eq!(game.winner(), Some(Player::Two));
    }

    #[test]
    fn test_open_ring_is_not_enclosure() {
        let mut ring = CENTER_RING.to_vec();
        ring[0] = (0, 5);
        let game = ring_position(&ring, (10, 10));
        assert!(!is_enclosure_win(&game));
        assert!(!game.is_terminal());
    }

    #[test]
    fn test_empty_pocket_is_not_enclosure() {
        // Same ring, but the sealed cell is empty
        let one = cells(&[(16, 5), (16, 7), (16, 9), (16, 11), (16, 13), (2, 5)]);
        let two = cells(&CENTER_RING);
        let game = GameState::from_position(&one, &two, Some(Cell::new(10, 10))).unwrap();
        assert!(!is_enclosure_win(&game));
    }

    #[test]
    fn test_own_stone_in_pocket_is_not_enclosure() {
        // Player one rings its own stone: only opponent stones count
        let one = cells(&[(9, 9), (9, 8), (9, 10), (8, 9), (8, 10), (10, 9), (10, 10)]);
        let two = cells(&[(2, 5), (2, 7), (2, 9), (2, 11), (2, 13), (16, 5)]);
        let game = GameState::from_position(&one, &two, Some(Cell::new(10, 10))).unwrap();
        assert!(!is_enclosure_win(&game));
    }

    #[test]
    fn test_two_cell_pocket() {
        let one = cells(&[
            (9, 9),
            (16, 4),
            (16, 6),
            (16, 8),
            (16, 10),
            (16, 12),
            (16, 14),
            (2, 8),
        ]);
        let two = cells(&[
            (9, 8),
            (9, 11),
            (8, 9),
            (8, 10),
            (8, 11),
            (10, 9),
            (10, 10),
            (10, 11),
        ]);
        let game = GameState::from_position(&one, &two, Some(Cell::new(8, 11))).unwrap();
        assert!(is_enclosure_win(&game));
        assert_eq!(game.result(), crate::game::GameResult::PlayerTwoWins);
    }

    #[test]
    fn test_can_see_border_only_blocked_by_mover() {
        let game = ring_position(&CENTER_RING, (10, 10));
        let center = Cell::new(9, 9);
        assert!(!can_see_border(&game, center, Player::Two));
        assert!(can_see_border(&game, center, Player::One));
    }
}
