//! Shell glue: two engines, one clock, at most one active engine

use serde::{Deserialize, Serialize};

use crate::blocks::{BlockGame, BlockSnapshot};
use crate::driver::{Simulation, SimulationLoop};
use crate::events::GameEvent;
use crate::maze::{MazeGame, MazeSnapshot};
use crate::quiz::GamePhase;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameKind {
    Blocks,
    Maze,
}

/// Snapshot of whichever engine is active
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum ArcadeSnapshot {
    Blocks(BlockSnapshot),
    Maze(MazeSnapshot),
}

#[derive(Debug, Clone)]
pub struct Arcade {
    blocks: BlockGame,
    maze: MazeGame,
    clock: SimulationLoop,
    active: Option<GameKind>,
}

impl Arcade {
    /// Both engines get their own RNG stream derived from `seed`
    pub fn new(seed: u64, settings: &Settings) -> Self {
        Self {
            blocks: BlockGame::new(seed, settings),
            maze: MazeGame::new(seed.wrapping_add(1), settings),
            clock: SimulationLoop::new(),
            active: None,
        }
    }

    pub fn active(&self) -> Option<GameKind> {
        self.active
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_armed()
    }

    pub fn blocks(&self) -> &BlockGame {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut BlockGame {
        &mut self.blocks
    }

    pub fn maze(&self) -> &MazeGame {
        &self.maze
    }

    pub fn maze_mut(&mut self) -> &mut MazeGame {
        &mut self.maze
    }

    fn engine_mut(&mut self, kind: GameKind) -> &mut dyn Simulation {
        match kind {
            GameKind::Blocks => &mut self.blocks,
            GameKind::Maze => &mut self.maze,
        }
    }

    /// Stop whatever is ticking, start `kind` from fresh state and arm the clock
    pub fn select(&mut self, kind: GameKind) {
        self.clock.stop();
        self.engine_mut(kind).start();
        self.active = Some(kind);
        self.clock.start();
        log::info!("Switched to {:?}", kind);
    }

    /// Halt the clock; the active engine keeps its state
    pub fn stop(&mut self) -> bool {
        self.clock.stop()
    }

    /// Re-arm the clock for the active engine without resetting it.
    /// Returns false if nothing is selected or the clock is already running.
    pub fn resume(&mut self) -> bool {
        self.active.is_some() && self.clock.start()
    }

    /// Restart the active engine in place
    pub fn restart(&mut self) {
        match self.active {
            Some(GameKind::Blocks) => self.blocks.restart(),
            Some(GameKind::Maze) => self.maze.restart(),
            None => {}
        }
    }

    /// Feed elapsed wall-clock time. Returns ticks that advanced the active engine.
    pub fn advance(&mut self, elapsed_ms: u64) -> u32 {
        let Some(kind) = self.active else {
            return 0;
        };
        let engine: &mut dyn Simulation = match kind {
            GameKind::Blocks => &mut self.blocks,
            GameKind::Maze => &mut self.maze,
        };
        self.clock.advance(engine, elapsed_ms)
    }

    pub fn phase(&self) -> Option<GamePhase> {
        self.active.map(|kind| match kind {
            GameKind::Blocks => self.blocks.phase(),
            GameKind::Maze => self.maze.phase(),
        })
    }

    pub fn snapshot(&self) -> Option<ArcadeSnapshot> {
        self.active.map(|kind| match kind {
            GameKind::Blocks => ArcadeSnapshot::Blocks(self.blocks.snapshot()),
            GameKind::Maze => ArcadeSnapshot::Maze(self.maze.snapshot()),
        })
    }

    /// Events from the active engine since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        match self.active {
            Some(GameKind::Blocks) => self.blocks.drain_events(),
            Some(GameKind::Maze) => self.maze.drain_events(),
            None => Vec::new(),
        }
    }
}
