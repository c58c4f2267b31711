//! Player token and pursuer AI

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::layout::Maze;
use super::movement::{Direction, grid_cell};
use crate::consts::{MAZE_COLS, MAZE_ROWS};

/// Actor spawn tile
pub const ACTOR_SPAWN: Vec2 = Vec2::new(14.0, 23.0);
/// Where an eaten pursuer reappears
pub const PURSUER_RESPAWN: Vec2 = Vec2::new(14.0, 14.0);
pub const PURSUER_COUNT: usize = 4;

/// The player-controlled token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub pos: Vec2,
    pub dir: Direction,
    /// Buffered turn, applied as soon as the adjacent tile is open
    pub pending_dir: Direction,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            pos: ACTOR_SPAWN,
            dir: Direction::Right,
            pending_dir: Direction::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PursuerMode {
    /// Head for a fixed corner
    Scatter,
    /// Head for the actor
    Chase,
    /// Wander randomly; can be eaten
    Frightened,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pursuer {
    pub id: usize,
    pub pos: Vec2,
    pub dir: Direction,
    pub mode: PursuerMode,
    pub mode_timer: u32,
    pub home: Vec2,
    pub scatter_target: Vec2,
}

impl Pursuer {
    /// Pursuer `id` at its home tile in SCATTER
    pub fn new(id: usize) -> Self {
        let home = Vec2::new(13.0 + id as f32, 14.0);
        let corner_row = if id % 2 == 0 { 0.0 } else { (MAZE_ROWS - 1) as f32 };
        Self {
            id,
            pos: home,
            dir: Direction::Right,
            mode: PursuerMode::Scatter,
            mode_timer: 0,
            home,
            scatter_target: Vec2::new((id * 9) as f32, corner_row),
        }
    }

    /// The standard set of four
    pub fn squad() -> Vec<Pursuer> {
        (0..PURSUER_COUNT).map(Pursuer::new).collect()
    }

    /// Target tile for this tick. Frightened targets are re-rolled every call.
    pub fn target<R: Rng + ?Sized>(&self, actor: &Actor, rng: &mut R) -> Vec2 {
        match self.mode {
            PursuerMode::Frightened => Vec2::new(
                rng.random::<f32>() * MAZE_COLS as f32,
                rng.random::<f32>() * MAZE_ROWS as f32,
            ),
            PursuerMode::Chase => actor.pos,
            PursuerMode::Scatter => self.scatter_target,
        }
    }

    /// Greedy steering: the open neighbour tile closest to `target`.
    /// Ties keep the current direction when it is among the best, otherwise
    /// the first in right, down, left, up order wins. With no open neighbour
    /// the direction is unchanged.
    pub fn choose_direction(&self, maze: &Maze, target: Vec2) -> Direction {
        let (col, row) = grid_cell(self.pos);
        let mut best: Option<(Direction, f32)> = None;
        let mut current_dist = None;

        for dir in Direction::ALL {
            let (dx, dy) = dir.delta();
            let mut check_x = col + dx;
            let check_y = row + dy;
            if check_x < 0 {
                check_x = MAZE_COLS as i32 - 1;
            } else if check_x >= MAZE_COLS as i32 {
                check_x = 0;
            }
            if !maze.is_open(check_x, check_y) {
                continue;
            }

            let dist = Vec2::new(check_x as f32, check_y as f32).distance(target);
            if dir == self.dir {
                current_dist = Some(dist);
            }
            if best.is_none_or(|(_, best_dist)| dist < best_dist) {
                best = Some((dir, dist));
            }
        }

        match (best, current_dist) {
            (Some((_, best_dist)), Some(dist)) if dist == best_dist => self.dir,
            (Some((dir, _)), _) => dir,
            (None, _) => self.dir,
        }
    }

    /// Count one tick and alternate SCATTER/CHASE once the period is exceeded.
    /// FRIGHTENED is left to the power timer.
    pub fn advance_mode_timer(&mut self, period: u32) {
        self.mode_timer += 1;
        if self.mode_timer > period {
            match self.mode {
                PursuerMode::Scatter => {
                    self.mode = PursuerMode::Chase;
                    self.mode_timer = 0;
                }
                PursuerMode::Chase => {
                    self.mode = PursuerMode::Scatter;
                    self.mode_timer = 0;
                }
                PursuerMode::Frightened => {}
            }
        }
    }

    /// Back to the respawn tile after being eaten
    pub fn send_home(&mut self) {
        self.pos = PURSUER_RESPAWN;
        self.mode = PursuerMode::Scatter;
        self.mode_timer = 0;
    }
}
