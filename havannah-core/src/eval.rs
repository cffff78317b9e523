//! Position evaluation

use crate::game::GameState;
use crate::win;

/// Bonus for a move that seals an enclosure
pub const ENCLOSURE_BONUS: i32 = 5;

/// Penalty for a move with no opponent stone next to it
pub const ISOLATION_PENALTY: i32 = 1;

/// Evaluate position from the perspective of the player who made the last
/// move. The empty board scores 0.
pub fn evaluate(state: &GameState) -> i32 {
    let (Some(last), Some(mover)) = (state.last_move(), state.mover()) else {
        return 0;
    };

    let lines = win::line_lengths(state);
    let mut value = lines.iter().copied().max().unwrap_or(0) as i32;

    if win::is_enclosure_win(state) {
        value += ENCLOSURE_BONUS;
    }

    let opponent = mover.opponent();
    let contested = last
        .neighbors()
        .iter()
        .any(|&n| state.owner(n) == Some(opponent));
    if !contested {
        value -= ISOLATION_PENALTY;
    }

    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    fn cells(coords: &[(i8, i8)]) -> Vec<Cell> {
        coords.iter().map(|&(r, c)| Cell::new(r, c)).collect()
    }

    #[test]
    fn test_empty_board() {
        assert_eq!(evaluate(&GameState::new()), 0);
    }

    #[test]
    fn test_opening_is_isolated() {
        let game = GameState::from_moves(&cells(&[(9, 9)])).unwrap();
        // Single stone run, no opponent nearby
        assert_eq!(evaluate(&game), 0);
    }

    #[test]
    fn test_contested_reply() {
        let game = GameState::from_moves(&cells(&[(9, 9), (8, 9)])).unwrap();
        assert_eq!(evaluate(&game), 1);
    }

    #[test]
    fn test_line_drives_score() {
        let moves = cells(&[(9, 9), (8, 9), (9, 8), (8, 8), (9, 7), (8, 7), (9, 6)]);
        let game = GameState::from_moves(&moves).unwrap();
        assert_eq!(evaluate(&game), 4);
        // Same state evaluated twice
        assert_eq!(evaluate(&game), evaluate(&game));
    }

    #[test]
    fn test_enclosure_bonus() {
        let one = cells(&[(9, 9), (16, 5), (16, 7), (16, 9), (16, 11), (16, 13)]);
        let two = cells(&[(9, 8), (9, 10), (8, 9), (8, 10), (10, 9), (10, 10)]);
        let game = GameState::from_position(&one, &two, Some(Cell::new(10, 10))).unwrap();
        // Row run of 2, enclosure, touches the trapped stone
        assert_eq!(evaluate(&game), 2 + ENCLOSURE_BONUS);
    }
}
