//! Fixed-size block board: placement checks, stamping, row clears

use serde::{Deserialize, Serialize};

use super::piece::{Piece, Position};
use crate::consts::{BOARD_HEIGHT, BOARD_WIDTH};

/// Reward per lock, indexed by rows cleared in that lock
pub const LINE_REWARDS: [u64; 5] = [0, 100, 300, 500, 800];

/// Score for clearing `rows_cleared` rows at once at `level`
pub fn calculate_score(rows_cleared: u32, level: u32) -> u64 {
    let base = LINE_REWARDS.get(rows_cleared as usize).copied().unwrap_or(0);
    base * u64::from(level)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub filled: bool,
    /// RGB of the piece that filled it
    pub color: Option<u32>,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        filled: false,
        color: None,
    };

    pub fn filled(color: u32) -> Self {
        Self {
            filled: true,
            color: Some(color),
        }
    }
}

pub type Row = [Cell; BOARD_WIDTH];

/// 10×20 grid, row 0 at the top. Dimensions never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: Vec<Row>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            rows: vec![[Cell::EMPTY; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Fill a single cell (used to set up positions)
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if let Some(slot) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *slot = cell;
        }
    }

    fn is_open(&self, row: i32, col: i32) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        self.cell(row as usize, col as usize)
            .is_some_and(|cell| !cell.filled)
    }

    /// Every occupied cell of `piece` at `pos` is in bounds and unfilled
    pub fn can_place(&self, piece: &Piece, pos: Position) -> bool {
        piece.cells_at(pos).all(|(row, col)| self.is_open(row, col))
    }

    /// Write the piece's cells into the board
    pub fn stamp(&mut self, piece: &Piece, pos: Position) {
        for (row, col) in piece.cells_at(pos) {
            if row >= 0 && col >= 0 {
                self.set(row as usize, col as usize, Cell::filled(piece.color));
            }
        }
    }

    pub fn is_row_full(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .is_some_and(|r| r.iter().all(|cell| cell.filled))
    }

    /// Remove full rows bottom-to-top, shifting everything above down.
    /// Returns the number of rows removed.
    pub fn clear_rows(&mut self) -> u32 {
        let mut cleared = 0;
        let mut row = BOARD_HEIGHT;
        while row > 0 {
            let index = row - 1;
            if self.is_row_full(index) {
                self.rows.remove(index);
                self.rows.insert(0, [Cell::EMPTY; BOARD_WIDTH]);
                cleared += 1;
                // Rows above shifted into `index`; examine it again
            } else {
                row -= 1;
            }
        }
        cleared
    }

    /// Lowest row the piece can drop to from `pos` (ghost piece anchor)
    pub fn drop_row(&self, piece: &Piece, pos: Position) -> i32 {
        let mut landing = pos;
        while self.can_place(piece, landing.offset(1, 0)) {
            landing = landing.offset(1, 0);
        }
        landing.row
    }
}
