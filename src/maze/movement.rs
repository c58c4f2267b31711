//! Grid-locked continuous movement
//!
//! Tokens hold fractional positions in tile units and move along one axis at
//! a time. The perpendicular coordinate snaps to the corridor centreline, and
//! the tile being entered is tested before the boundary is crossed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::layout::Maze;
use crate::consts::MAZE_COLS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    /// Evaluation order for pursuer steering ties
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
        }
    }
}

/// Round half up (`-0.5` rounds to `0`)
#[inline]
pub fn grid_round(v: f32) -> i32 {
    (v + 0.5).floor() as i32
}

/// Tile a token is considered to be on
#[inline]
pub fn grid_cell(pos: Vec2) -> (i32, i32) {
    (grid_round(pos.x), grid_round(pos.y))
}

/// Horizontal tunnel: leaving one edge re-enters at the other
#[inline]
pub fn wrap_tunnel(x: f32) -> f32 {
    let right_edge = MAZE_COLS as f32 - 0.5;
    if x < -0.5 {
        right_edge
    } else if x >= right_edge {
        -0.5
    } else {
        x
    }
}

/// Whether the tile next to the token's rounded position in `dir` is open
pub fn can_turn(maze: &Maze, pos: Vec2, dir: Direction) -> bool {
    let (col, row) = grid_cell(pos);
    let (dx, dy) = dir.delta();
    maze.is_open(col + dx, row + dy)
}

/// Advance `pos` by `speed` in `dir`. Returns `None` when the tile being
/// entered is a wall, in which case the token stays put this tick.
pub fn step(maze: &Maze, pos: Vec2, dir: Direction, speed: f32) -> Option<Vec2> {
    let (dx, dy) = dir.delta();
    let mut next = pos + Vec2::new(dx as f32, dy as f32) * speed;

    // Corridor centring
    if dx != 0 {
        next.y = grid_round(pos.y) as f32;
    } else {
        next.x = grid_round(pos.x) as f32;
    }

    // Entering tile, not the nearest one
    let check_x = match dx {
        1 => next.x.ceil() as i32,
        -1 => next.x.floor() as i32,
        _ => grid_round(next.x),
    };
    let check_y = match dy {
        1 => next.y.ceil() as i32,
        -1 => next.y.floor() as i32,
        _ => grid_round(next.y),
    };
    if !maze.is_open(check_x, check_y) {
        return None;
    }

    next.x = wrap_tunnel(next.x);
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_round_half_up() {
        assert_eq!(grid_round(14.5), 15);
        assert_eq!(grid_round(14.49), 14);
        assert_eq!(grid_round(-0.5), 0);
        assert_eq!(grid_round(-0.51), -1);
    }

    #[test]
    fn test_wrap_tunnel() {
        assert_eq!(wrap_tunnel(-0.55), MAZE_COLS as f32 - 0.5);
        assert_eq!(wrap_tunnel(MAZE_COLS as f32 - 0.45), -0.5);
        assert_eq!(wrap_tunnel(10.0), 10.0);
        // Re-entering from the right does not bounce straight back
        assert_eq!(wrap_tunnel(MAZE_COLS as f32 - 0.65), MAZE_COLS as f32 - 0.65);
    }

    #[test]
    fn test_step_in_open_corridor() {
        let maze = Maze::classic();
        let next = step(&maze, Vec2::new(1.0, 1.0), Direction::Right, 0.15).unwrap();
        assert!((next.x - 1.15).abs() < 1e-6);
        assert_eq!(next.y, 1.0);
    }

    #[test]
    fn test_step_blocked_at_tile_boundary() {
        let maze = Maze::classic();
        // (12, 1) is open, (13, 1) is a wall: ceil() sees it before crossing
        assert!(step(&maze, Vec2::new(12.0, 1.0), Direction::Right, 0.15).is_none());
        // Moving up from row 1 hits the border
        assert!(step(&maze, Vec2::new(1.0, 1.0), Direction::Up, 0.15).is_none());
    }

    #[test]
    fn test_step_snaps_perpendicular_axis() {
        let maze = Maze::classic();
        let next = step(&maze, Vec2::new(1.0, 1.3), Direction::Right, 0.15).unwrap();
        assert_eq!(next.y, 1.0);
        let next = step(&maze, Vec2::new(6.2, 2.0), Direction::Down, 0.15).unwrap();
        assert_eq!(next.x, 6.0);
    }

    #[test]
    fn test_step_through_left_tunnel() {
        let maze = Maze::classic();
        let next = step(&maze, Vec2::new(-0.4, 14.0), Direction::Left, 0.15).unwrap();
        assert_eq!(next.x, MAZE_COLS as f32 - 0.5);
        assert_eq!(next.y, 14.0);
    }

    #[test]
    fn test_step_through_right_tunnel() {
        let maze = Maze::classic();
        let next = step(&maze, Vec2::new(27.4, 14.0), Direction::Right, 0.15).unwrap();
        assert_eq!(next.x, -0.5);
        assert_eq!(next.y, 14.0);
    }

    #[test]
    fn test_can_turn() {
        let maze = Maze::classic();
        // At (6, 5): up (6, 4) open, right (7, 5) open, (6, 6) open
        assert!(can_turn(&maze, Vec2::new(6.0, 5.0), Direction::Up));
        // At (2, 1): down is wall
        assert!(!can_turn(&maze, Vec2::new(2.0, 1.0), Direction::Down));
        // Rounded position decides
        assert!(can_turn(&maze, Vec2::new(5.6, 5.0), Direction::Down));
    }
}
