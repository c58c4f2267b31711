//! Maze grid and the classic layout

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MAZE_COLS, MAZE_ROWS};

/// Contents of one maze tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    Wall,
    Dot,
    PowerPellet,
    Empty,
    GhostHouse,
}

impl CellKind {
    fn from_code(code: u8) -> Self {
        match code {
            0 => CellKind::Wall,
            1 => CellKind::Dot,
            2 => CellKind::PowerPellet,
            4 => CellKind::GhostHouse,
            _ => CellKind::Empty,
        }
    }

    pub fn is_edible(&self) -> bool {
        matches!(self, CellKind::Dot | CellKind::PowerPellet)
    }
}

/// 0 wall, 1 dot, 2 power pellet, 3 empty, 4 ghost house
#[rustfmt::skip]
const CLASSIC_LAYOUT: [[u8; MAZE_COLS]; MAZE_ROWS] = [
    [0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0],
    [0,1,1,1,1,1,1,1,1,1,1,1,1,0,0,1,1,1,1,1,1,1,1,1,1,1,1,0],
    [0,1,0,0,0,0,1,0,0,0,0,0,1,0,0,1,0,0,0,0,0,1,0,0,0,0,1,0],
    [0,2,0,0,0,0,1,0,0,0,0,0,1,0,0,1,0,0,0,0,0,1,0,0,0,0,2,0],
    [0,1,0,0,0,0,1,0,0,0,0,0,1,0,0,1,0,0,0,0,0,1,0,0,0,0,1,0],
    [0,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,0],
    [0,1,0,0,0,0,1,0,0,1,0,0,0,0,0,0,0,0,1,0,0,1,0,0,0,0,1,0],
    [0,1,0,0,0,0,1,0,0,1,0,0,0,0,0,0,0,0,1,0,0,1,0,0,0,0,1,0],
    [0,1,1,1,1,1,1,0,0,1,1,1,1,0,0,1,1,1,1,0,0,1,1,1,1,1,1,0],
    [0,0,0,0,0,0,1,0,0,0,0,0,3,0,0,3,0,0,0,0,0,1,0,0,0,0,0,0],
    [0,0,0,0,0,0,1,0,0,0,0,0,3,0,0,3,0,0,0,0,0,1,0,0,0,0,0,0],
    [0,0,0,0,0,0,1,0,0,3,3,3,3,3,3,3,3,3,3,0,0,1,0,0,0,0,0,0],
    [0,0,0,0,0,0,1,0,0,3,0,0,0,4,4,0,0,0,3,0,0,1,0,0,0,0,0,0],
    [0,0,0,0,0,0,1,0,0,3,0,4,4,4,4,4,4,0,3,0,0,1,0,0,0,0,0,0],
    [3,3,3,3,3,3,1,3,3,3,0,4,4,4,4,4,4,0,3,3,3,1,3,3,3,3,3,3],
    [0,0,0,0,0,0,1,0,0,3,0,4,4,4,4,4,4,0,3,0,0,1,0,0,0,0,0,0],
    [0,0,0,0,0,0,1,0,0,3,0,0,0,0,0,0,0,0,3,0,0,1,0,0,0,0,0,0],
    [0,0,0,0,0,0,1,0,0,3,3,3,3,3,3,3,3,3,3,0,0,1,0,0,0,0,0,0],
    [0,0,0,0,0,0,1,0,0,3,0,0,0,0,0,0,0,0,3,0,0,1,0,0,0,0,0,0],
    [0,0,0,0,0,0,1,0,0,3,0,0,0,0,0,0,0,0,3,0,0,1,0,0,0,0,0,0],
    [0,1,1,1,1,1,1,1,1,1,1,1,1,0,0,1,1,1,1,1,1,1,1,1,1,1,1,0],
    [0,1,0,0,0,0,1,0,0,0,0,0,1,0,0,1,0,0,0,0,0,1,0,0,0,0,1,0],
    [0,1,0,0,0,0,1,0,0,0,0,0,1,0,0,1,0,0,0,0,0,1,0,0,0,0,1,0],
    [0,2,1,1,0,0,1,1,1,1,1,1,1,3,3,1,1,1,1,1,1,1,0,0,1,1,2,0],
    [0,0,0,1,0,0,1,0,0,1,0,0,0,0,0,0,0,0,1,0,0,1,0,0,1,0,0,0],
    [0,0,0,1,0,0,1,0,0,1,0,0,0,0,0,0,0,0,1,0,0,1,0,0,1,0,0,0],
    [0,1,1,1,1,1,1,0,0,1,1,1,1,0,0,1,1,1,1,0,0,1,1,1,1,1,1,0],
    [0,1,0,0,0,0,0,0,0,0,0,0,1,0,0,1,0,0,0,0,0,0,0,0,0,0,1,0],
    [0,1,0,0,0,0,0,0,0,0,0,0,1,0,0,1,0,0,0,0,0,0,0,0,0,0,1,0],
    [0,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,0],
    [0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0],
];

/// 28×31 maze, mutated in place as dots are eaten
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    cells: Vec<CellKind>,
    total_dots: u32,
}

impl Default for Maze {
    fn default() -> Self {
        Self::classic()
    }
}

impl Maze {
    pub fn classic() -> Self {
        let cells: Vec<CellKind> = CLASSIC_LAYOUT
            .iter()
            .flatten()
            .map(|&code| CellKind::from_code(code))
            .collect();
        let total_dots = cells.iter().filter(|c| c.is_edible()).count() as u32;
        Self { cells, total_dots }
    }

    /// Dots and power pellets at construction
    pub fn total_dots(&self) -> u32 {
        self.total_dots
    }

    pub fn remaining_dots(&self) -> u32 {
        self.cells.iter().filter(|c| c.is_edible()).count() as u32
    }

    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }

    fn index(col: i32, row: i32) -> Option<usize> {
        let in_bounds =
            (0..MAZE_COLS as i32).contains(&col) && (0..MAZE_ROWS as i32).contains(&row);
        in_bounds.then(|| row as usize * MAZE_COLS + col as usize)
    }

    pub fn get(&self, col: i32, row: i32) -> Option<CellKind> {
        Self::index(col, row).map(|i| self.cells[i])
    }

    pub fn set(&mut self, col: i32, row: i32, kind: CellKind) {
        if let Some(i) = Self::index(col, row) {
            self.cells[i] = kind;
        }
    }

    /// Passable tile check with horizontal wrap; rows outside the maze are blocked
    pub fn is_open(&self, col: i32, row: i32) -> bool {
        let col = if col < 0 {
            MAZE_COLS as i32 - 1
        } else if col >= MAZE_COLS as i32 {
            0
        } else {
            col
        };
        self.get(col, row).is_some_and(|kind| kind != CellKind::Wall)
    }

    /// Whether a token centred at `pos` fits: the tile under its centre and
    /// the tiles under its four corners (offset by `margin`) are all open
    pub fn can_occupy(&self, pos: Vec2, margin: f32) -> bool {
        if pos.y < 0.0 || pos.y >= MAZE_ROWS as f32 {
            return false;
        }
        let wrap_col = |x: f32| -> i32 {
            if x < 0.0 {
                MAZE_COLS as i32 - 1
            } else if x >= MAZE_COLS as f32 {
                0
            } else {
                x.floor() as i32
            }
        };
        if !self.is_open(wrap_col(pos.x), pos.y.floor() as i32) {
            return false;
        }

        let corners = [
            Vec2::new(-margin, -margin),
            Vec2::new(margin, -margin),
            Vec2::new(-margin, margin),
            Vec2::new(margin, margin),
        ];
        corners.iter().all(|offset| {
            let p = pos + *offset;
            if p.y < 0.0 || p.y >= MAZE_ROWS as f32 {
                return true;
            }
            self.is_open(wrap_col(p.x), p.y.floor() as i32)
        })
    }

    /// Eat whatever is at the tile, returning it if it was a dot or pellet
    pub fn consume(&mut self, col: i32, row: i32) -> Option<CellKind> {
        let kind = self.get(col, row)?;
        if kind.is_edible() {
            self.set(col, row, CellKind::Empty);
            Some(kind)
        } else {
            None
        }
    }
}
