//! Hex board geometry with offset (row, column) coordinates
//!
//! The board is a hexagon of hexagons: 19 rows whose column ranges widen
//! towards the middle row. Odd rows are drawn shifted half a cell to the
//! right, so the diagonal neighbors of a cell depend on its row parity.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Number of rows on the board
pub const ROWS: i8 = 19;

/// Inclusive column range of each row
pub const COLUMN_RANGES: [(i8, i8); ROWS as usize] = [
    (5, 14),
    (4, 14),
    (4, 15),
    (3, 15),
    (3, 16),
    (2, 16),
    (2, 17),
    (1, 17),
    (1, 18),
    (0, 18),
    (1, 18),
    (1, 17),
    (2, 17),
    (2, 16),
    (3, 16),
    (3, 15),
    (4, 15),
    (4, 14),
    (5, 14),
];

/// Opening cell, the only legal first move
pub const CENTER: Cell = Cell::new(9, 9);

/// Widest row, used to size lookup tables
const MAX_COLUMNS: usize = 19;

// ============================================================================
// CELL
// ============================================================================

/// Offset hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: i8,
    pub col: i8,
}

impl Cell {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Check if this cell is on the board
    pub fn is_valid(&self) -> bool {
        is_valid(self.row, self.col)
    }

    /// One step in a direction (may leave the board)
    pub fn step(&self, direction: Direction) -> Cell {
        let (row, col) = direction.step(self.row, self.col);
        Cell::new(row, col)
    }

    /// On-board neighbors, read from the precomputed table
    pub fn neighbors(&self) -> &'static [Cell] {
        HexGrid::get().neighbors(*self)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// Check whether (row, col) lies inside the hexagonal region
pub fn is_valid(row: i8, col: i8) -> bool {
    if !(0..ROWS).contains(&row) {
        return false;
    }
    let (min, max) = COLUMN_RANGES[row as usize];
    (min..=max).contains(&col)
}

fn is_even_row(row: i8) -> bool {
    row & 1 == 0
}

// ============================================================================
// DIRECTIONS
// ============================================================================

/// The six hex directions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Left,
        Direction::Right,
        Direction::UpperLeft,
        Direction::UpperRight,
        Direction::LowerLeft,
        Direction::LowerRight,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::UpperLeft => Direction::LowerRight,
            Direction::UpperRight => Direction::LowerLeft,
            Direction::LowerLeft => Direction::UpperRight,
            Direction::LowerRight => Direction::UpperLeft,
        }
    }

    /// Coordinates one step away from (row, col).
    ///
    /// Left and right keep the row. The left-leaning diagonals shift the
    /// column only from even rows, the right-leaning ones only from odd rows.
    pub fn step(self, row: i8, col: i8) -> (i8, i8) {
        let even = is_even_row(row);
        match self {
            Direction::Left => (row, col - 1),
            Direction::Right => (row, col + 1),
            Direction::UpperLeft => (row - 1, if even { col - 1 } else { col }),
            Direction::UpperRight => (row - 1, if even { col } else { col + 1 }),
            Direction::LowerLeft => (row + 1, if even { col - 1 } else { col }),
            Direction::LowerRight => (row + 1, if even { col } else { col + 1 }),
        }
    }
}

/// Line axes as (backward, forward) direction pairs:
/// row-constant, ascending diagonal, descending diagonal
pub const AXES: [(Direction, Direction); 3] = [
    (Direction::Left, Direction::Right),
    (Direction::LowerLeft, Direction::UpperRight),
    (Direction::UpperLeft, Direction::LowerRight),
];

// ============================================================================
// HEX GRID
// ============================================================================

/// Static board geometry, built once per process
#[derive(Debug)]
pub struct HexGrid {
    cells: Vec<Cell>,
    index: [[Option<u16>; MAX_COLUMNS]; ROWS as usize],
    neighbors: Vec<Vec<Cell>>,
}

static GRID: OnceLock<HexGrid> = OnceLock::new();

impl HexGrid {
    /// Shared grid instance
    pub fn get() -> &'static HexGrid {
        GRID.get_or_init(HexGrid::build)
    }

    fn build() -> Self {
        let mut cells = Vec::new();
        let mut index = [[None; MAX_COLUMNS]; ROWS as usize];

        for (row, &(min, max)) in COLUMN_RANGES.iter().enumerate() {
            for col in min..=max {
                index[row][col as usize] = Some(cells.len() as u16);
                cells.push(Cell::new(row as i8, col));
            }
        }

        let neighbors = cells
            .iter()
            .map(|cell| {
                Direction::ALL
                    .iter()
                    .map(|&dir| cell.step(dir))
                    .filter(Cell::is_valid)
                    .collect()
            })
            .collect();

        Self {
            cells,
            index,
            neighbors,
        }
    }

    /// All valid cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Dense index of a cell, if it is on the board
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        if !cell.is_valid() {
            return None;
        }
        self.index[cell.row as usize][cell.col as usize].map(usize::from)
    }

    pub fn contains(&self, row: i8, col: i8) -> bool {
        is_valid(row, col)
    }

    /// Neighbors of a cell (empty for off-board cells)
    pub fn neighbors(&self, cell: Cell) -> &[Cell] {
        match self.index_of(cell) {
            Some(i) => &self.neighbors[i],
            None => &[],
        }
    }

    /// Walk from `cell` in one direction until leaving the board (true)
    /// or meeting a blocking stone (false)
    pub fn sees_border_towards<F>(&self, cell: Cell, direction: Direction, is_blocker: F) -> bool
    where
        F: Fn(Cell) -> bool,
    {
        let mut current = cell;
        loop {
            current = current.step(direction);
            if !current.is_valid() {
                return true;
            }
            if is_blocker(current) {
                return false;
            }
        }
    }

    /// True if any of the six rays from `cell` reaches the outer border
    /// without crossing a blocking stone
    pub fn can_see_border<F>(&self, cell: Cell, is_blocker: F) -> bool
    where
        F: Fn(Cell) -> bool,
    {
        Direction::ALL
            .iter()
            .any(|&dir| self.sees_border_towards(cell, dir, &is_blocker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_validity() {
        assert!(Cell::new(9, 9).is_valid());
        assert!(Cell::new(0, 5).is_valid());
        assert!(Cell::new(0, 14).is_valid());
        assert!(Cell::new(9, 0).is_valid());
        assert!(Cell::new(9, 18).is_valid());
        assert!(!Cell::new(0, 4).is_valid());
        assert!(!Cell::new(0, 15).is_valid());
        assert!(!Cell::new(-1, 9).is_valid());
        assert!(!Cell::new(19, 9).is_valid());
        assert!(!Cell::new(10, 0).is_valid());
    }

    #[test]
    fn test_grid_size() {
        let grid = HexGrid::get();
        assert_eq!(grid.len(), 271);
        assert_eq!(grid.index_of(Cell::new(0, 5)), Some(0));
        assert_eq!(grid.index_of(Cell::new(18, 14)), Some(270));
        assert_eq!(grid.index_of(Cell::new(0, 0)), None);
    }

    #[test]
    fn test_center_neighbors() {
        let mut neighbors = CENTER.neighbors().to_vec();
        neighbors.sort();
        assert_eq!(
            neighbors,
            vec![
                Cell::new(8, 9),
                Cell::new(8, 10),
                Cell::new(9, 8),
                Cell::new(9, 10),
                Cell::new(10, 9),
                Cell::new(10, 10),
            ]
        );
    }

    #[test]
    fn test_even_row_neighbors() {
        let mut neighbors = Cell::new(8, 9).neighbors().to_vec();
        neighbors.sort();
        assert_eq!(
            neighbors,
            vec![
                Cell::new(7, 8),
                Cell::new(7, 9),
                Cell::new(8, 8),
                Cell::new(8, 10),
                Cell::new(9, 8),
                Cell::new(9, 9),
            ]
        );
    }

    #[test]
    fn test_corner_has_three_neighbors() {
        // Top-left corner of the hexagon
        assert_eq!(Cell::new(0, 5).neighbors().len(), 3);
        // Leftmost cell of the middle row
        assert_eq!(Cell::new(9, 0).neighbors().len(), 3);
    }

    #[test]
    fn test_neighbors_are_symmetric() {
        let grid = HexGrid::get();
        for &cell in grid.cells() {
            for &n in grid.neighbors(cell) {
                assert!(grid.neighbors(n).contains(&cell), "{} <-> {}", cell, n);
            }
        }
    }

    #[test]
    fn test_step_parity() {
        assert_eq!(Direction::UpperLeft.step(8, 9), (7, 8));
        assert_eq!(Direction::UpperLeft.step(9, 9), (8, 9));
        assert_eq!(Direction::UpperRight.step(8, 9), (7, 9));
        assert_eq!(Direction::UpperRight.step(9, 9), (8, 10));
        assert_eq!(Direction::LowerLeft.step(8, 9), (9, 8));
        assert_eq!(Direction::LowerRight.step(9, 9), (10, 10));
        for dir in Direction::ALL {
            let there = CENTER.step(dir);
            assert_eq!(there.step(dir.opposite()), CENTER);
        }
    }

    #[test]
    fn test_can_see_border() {
        let grid = HexGrid::get();
        assert!(grid.can_see_border(CENTER, |_| false));

        // Fully surrounded by blockers
        let ring = CENTER.neighbors();
        assert!(!grid.can_see_border(CENTER, |c| ring.contains(&c)));

        // One gap in the ring is enough
        let gap = Cell::new(9, 8);
        assert!(grid.can_see_border(CENTER, |c| c != gap && ring.contains(&c)));
        assert!(grid.sees_border_towards(CENTER, Direction::Left, |c| c != gap && ring.contains(&c)));
        assert!(!grid.sees_border_towards(CENTER, Direction::Right, |c| ring.contains(&c)));
    }
}
