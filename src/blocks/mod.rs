//! Falling-block puzzle engine
//!
//! - `piece`: tetromino shapes, colors and rotation
//! - `board`: 10×20 grid, placement validity, row clears, score table
//! - `engine`: lock / spawn / quiz-gate state machine

pub mod board;
pub mod engine;
pub mod piece;

pub use board::{Board, Cell, LINE_REWARDS, calculate_score};
pub use engine::{BlockGame, BlockSnapshot, SPAWN_POSITION, WALL_KICKS};
pub use piece::{Piece, Position, Shape, TetrominoKind};
