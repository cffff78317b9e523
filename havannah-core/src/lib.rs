//! Havannah Core - Game engine and AI
//!
//! This crate provides the core game logic:
//! - Board geometry (hexagon of hexagons in offset coordinates)
//! - Game state and bridge-rule move generation
//! - Line-of-five and enclosure win detection
//! - Position evaluation
//! - Principal-variation search with iterative deepening

pub mod board;
pub mod game;
pub mod win;
pub mod eval;
pub mod ai;
pub mod config;

// Re-exports for convenient access
pub use board::{Cell, Direction, HexGrid, AXES, CENTER};
pub use game::{GameResult, GameState, MoveError, Player, PositionError};
pub use eval::evaluate;
pub use ai::{best_move, search, PvsAI, SearchResult};
pub use config::SearchConfig;
