//! Gameplay events for passive consumers (audio, HUD flashes)
//!
//! Engines push events while ticking; the host drains them once per frame.
//! A host that never drains only loses the oldest events, memory stays bounded.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Undrained events kept per engine
pub const MAX_PENDING_EVENTS: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Block game: current piece stamped into the board
    PieceLocked,
    /// Block game: rows removed by a single lock
    RowsCleared(u32),
    LevelUp(u32),
    QuizTriggered,
    QuizAnswered { correct: bool },
    GameOver,
    Restarted,
    /// Maze game
    DotEaten,
    PowerPelletEaten,
    PursuerEaten(usize),
    LifeLost { lives_left: u8 },
    MazeCleared,
}

/// Bounded FIFO of undrained events; overflow evicts the oldest
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    pending: VecDeque<GameEvent>,
    dropped: usize,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        if self.pending.len() == MAX_PENDING_EVENTS {
            self.pending.pop_front();
            self.dropped += 1;
        }
        self.pending.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take everything pending, oldest first
    pub fn drain(&mut self) -> Vec<GameEvent> {
        if self.dropped > 0 {
            log::debug!("{} events dropped before drain", self.dropped);
            self.dropped = 0;
        }
        self.pending.drain(..).collect()
    }
}
