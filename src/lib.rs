//! Fraction Arcade - two arcade engines gated by a fraction quiz
//!
//! Core modules:
//! - `quiz`: Fraction arithmetic, question synthesis, pause/quiz-gate protocol
//! - `blocks`: Falling-block puzzle engine
//! - `maze`: Maze-chase engine with pursuer AI
//! - `driver`: Fixed-delay tick scheduling
//! - `arcade`: Shell glue that keeps exactly one engine ticking
//! - `settings`: Data-driven tuning
//!
//! Rendering, input plumbing and audio are left to the host. Engines expose
//! intents as method calls, render-ready snapshots and a drained event stream.

pub mod arcade;
pub mod blocks;
pub mod driver;
pub mod error;
pub mod events;
pub mod maze;
pub mod quiz;
pub mod settings;

pub use arcade::{Arcade, ArcadeSnapshot, GameKind};
pub use blocks::{BlockGame, BlockSnapshot};
pub use driver::{Simulation, SimulationLoop};
pub use error::{QuizError, SettingsError};
pub use events::{EventQueue, GameEvent, MAX_PENDING_EVENTS};
pub use maze::{Direction, MazeGame, MazeSnapshot};
pub use quiz::{Fraction, GamePhase, InterruptionController, Question, SubmitOutcome};
pub use settings::Settings;

/// Fixed dimensions shared by the engines
pub mod consts {
    /// Block board size (cells)
    pub const BOARD_WIDTH: usize = 10;
    pub const BOARD_HEIGHT: usize = 20;

    /// Maze size (tiles)
    pub const MAZE_COLS: usize = 28;
    pub const MAZE_ROWS: usize = 31;

    /// Maximum ticks run per clock update to prevent spiral of death
    pub const MAX_CATCHUP_TICKS: u32 = 8;
}
