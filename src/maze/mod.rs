//! Maze-chase engine
//!
//! - `layout`: 28×31 cell grid and the classic maze
//! - `movement`: corridor-locked stepping, grid rounding, tunnel wrap
//! - `pursuer`: actor token, pursuer modes and greedy steering
//! - `engine`: per-tick state machine (consumption, quiz breaks, lives)

pub mod engine;
pub mod layout;
pub mod movement;
pub mod pursuer;

pub use engine::{MazeGame, MazeSnapshot, QUIZ_BREAKS};
pub use layout::{CellKind, Maze};
pub use movement::{Direction, can_turn, grid_cell, grid_round, step, wrap_tunnel};
pub use pursuer::{ACTOR_SPAWN, Actor, PURSUER_COUNT, PURSUER_RESPAWN, Pursuer, PursuerMode};
