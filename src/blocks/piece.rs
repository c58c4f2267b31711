//! Tetromino definitions and rotation

use serde::{Deserialize, Serialize};

/// The seven tetromino kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TetrominoKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl TetrominoKind {
    pub const ALL: [TetrominoKind; 7] = [
        TetrominoKind::I,
        TetrominoKind::O,
        TetrominoKind::T,
        TetrominoKind::S,
        TetrominoKind::Z,
        TetrominoKind::J,
        TetrominoKind::L,
    ];

    /// Spawn orientation
    pub fn shape(&self) -> Shape {
        let rows: &[&[u8]] = match self {
            TetrominoKind::I => &[&[1, 1, 1, 1]],
            TetrominoKind::O => &[&[1, 1], &[1, 1]],
            TetrominoKind::T => &[&[0, 1, 0], &[1, 1, 1]],
            TetrominoKind::S => &[&[0, 1, 1], &[1, 1, 0]],
            TetrominoKind::Z => &[&[1, 1, 0], &[0, 1, 1]],
            TetrominoKind::J => &[&[1, 0, 0], &[1, 1, 1]],
            TetrominoKind::L => &[&[0, 0, 1], &[1, 1, 1]],
        };
        Shape::from_rows(rows)
    }

    /// RGB color (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            TetrominoKind::I => 0x00D4FF,
            TetrominoKind::O => 0xFFE135,
            TetrominoKind::T => 0xAA66CC,
            TetrominoKind::S => 0x66BB6A,
            TetrominoKind::Z => 0xFF6B6B,
            TetrominoKind::J => 0x5C6BC0,
            TetrominoKind::L => 0xFF9800,
        }
    }
}

/// Bit matrix of a piece's bounding box (row-major, row 0 = top)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    rows: Vec<Vec<bool>>,
}

impl Shape {
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|&bit| bit != 0).collect())
                .collect(),
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// New matrix rotated 90° clockwise; `self` is left untouched
    pub fn rotated_clockwise(&self) -> Shape {
        let (h, w) = (self.height(), self.width());
        let mut rows = vec![vec![false; h]; w];
        for (r, row) in self.rows.iter().enumerate() {
            for (c, &bit) in row.iter().enumerate() {
                rows[c][h - 1 - r] = bit;
            }
        }
        Shape { rows }
    }

    /// `(row, col)` offsets of occupied cells within the bounding box
    pub fn occupied_cells(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::with_capacity(4);
        for (r, row) in self.rows.iter().enumerate() {
            for (c, &bit) in row.iter().enumerate() {
                if bit {
                    cells.push((r, c));
                }
            }
        }
        cells
    }
}

/// Top-left anchor of a shape's bounding box on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(&self, d_row: i32, d_col: i32) -> Self {
        Self::new(self.row + d_row, self.col + d_col)
    }
}

/// A falling piece (shape in its current orientation)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: TetrominoKind,
    pub shape: Shape,
    pub color: u32,
}

impl Piece {
    pub fn new(kind: TetrominoKind) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            color: kind.color(),
        }
    }

    /// Candidate piece in the next clockwise orientation
    pub fn rotated(&self) -> Piece {
        Piece {
            kind: self.kind,
            shape: self.shape.rotated_clockwise(),
            color: self.color,
        }
    }

    /// Absolute board cells covered when anchored at `pos`
    pub fn cells_at(&self, pos: Position) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied_cells()
            .into_iter()
            .map(move |(r, c)| (pos.row + r as i32, pos.col + c as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_every_kind_has_four_cells() {
        for kind in TetrominoKind::ALL {
            assert_eq!(kind.shape().occupied_cells().len(), 4, "{kind:?}");
        }
    }

    #[test]
    fn test_rotate_t() {
        let t = TetrominoKind::T.shape().rotated_clockwise();
        // 010      10
        // 111  ->  11
        //          10
        assert_eq!(t, Shape::from_rows(&[&[1, 0], &[1, 1], &[1, 0]]));
    }

    #[test]
    fn test_rotate_i_swaps_dimensions() {
        let i = TetrominoKind::I.shape();
        let r = i.rotated_clockwise();
        assert_eq!((i.height(), i.width()), (1, 4));
        assert_eq!((r.height(), r.width()), (4, 1));
    }

    #[test]
    fn test_rotation_does_not_mutate_source() {
        let piece = Piece::new(TetrominoKind::L);
        let before = piece.clone();
        let _ = piece.rotated();
        assert_eq!(piece, before);
    }

    #[test]
    fn test_cells_at() {
        let piece = Piece::new(TetrominoKind::O);
        let cells: Vec<_> = piece.cells_at(Position::new(3, 5)).collect();
        assert_eq!(cells, vec![(3, 5), (3, 6), (4, 5), (4, 6)]);
    }

    proptest! {
        #[test]
        fn prop_four_rotations_identity(index in 0usize..7) {
            let piece = Piece::new(TetrominoKind::ALL[index]);
            let spun = piece.rotated().rotated().rotated().rotated();
            prop_assert_eq!(spun.shape.occupied_cells(), piece.shape.occupied_cells());
        }

        #[test]
        fn prop_rotation_keeps_cell_count(index in 0usize..7, turns in 0usize..8) {
            let mut piece = Piece::new(TetrominoKind::ALL[index]);
            for _ in 0..turns {
                piece = piece.rotated();
            }
            prop_assert_eq!(piece.shape.occupied_cells().len(), 4);
        }
    }
}
