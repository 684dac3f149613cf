use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MoveError;

use super::player::PlayerId;

/// Smallest allowed board side.
pub const MIN_DIMENSION: usize = 6;
/// Largest allowed board side.
pub const MAX_DIMENSION: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(PlayerId),
}

impl Cell {
    pub fn owner(self) -> Option<PlayerId> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(player) => Some(player),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// A cell position. Row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub row: usize,
    pub column: usize,
}

impl Placement {
    pub fn new(row: usize, column: usize) -> Self {
        Placement { row, column }
    }
}

/// Row-major grid of cells with gravity drops.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty `width` x `height` board
    pub fn new(width: usize, height: usize) -> Self {
        Board {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, row `height - 1` is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[self.index(row, col)]
    }

    pub fn owner(&self, row: usize, col: usize) -> Option<PlayerId> {
        self.get(row, col).owner()
    }

    /// Signed bounds check, used by directional walks.
    pub fn contains(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height && (col as usize) < self.width
    }

    pub fn is_corner(&self, row: usize, col: usize) -> bool {
        (row == 0 || row + 1 == self.height) && (col == 0 || col + 1 == self.width)
    }

    /// A column is full when none of its cells is empty. Out-of-range columns
    /// count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= self.width {
            return true;
        }
        (0..self.height).all(|row| !self.get(row, col).is_empty())
    }

    /// Columns that can still take a counter, left to right.
    pub fn legal_columns(&self) -> Vec<usize> {
        (0..self.width)
            .filter(|&col| !self.is_column_full(col))
            .collect()
    }

    /// Drop a counter in a column, returns the row where it landed
    pub fn drop_counter(&mut self, col: usize, player: PlayerId) -> Result<usize, MoveError> {
        if col >= self.width {
            return Err(MoveError::InvalidColumn {
                column: col,
                width: self.width,
            });
        }

        // Lowest empty row; bombs can leave holes below other counters
        for row in (0..self.height).rev() {
            let idx = self.index(row, col);
            if self.cells[idx].is_empty() {
                self.cells[idx] = Cell::Occupied(player);
                return Ok(row);
            }
        }

        Err(MoveError::ColumnFull { column: col })
    }

    /// Clear a cell. Out-of-bounds positions are ignored.
    pub fn remove(&mut self, row: usize, col: usize) {
        if row < self.height && col < self.width {
            let idx = self.index(row, col);
            self.cells[idx] = Cell::Empty;
        }
    }

    /// Remove a counter and let everything above it fall one row.
    pub fn collapse(&mut self, row: usize, col: usize) {
        if row >= self.height || col >= self.width {
            return;
        }
        for r in (1..=row).rev() {
            let above = self.get(r - 1, col);
            let idx = self.index(r, col);
            self.cells[idx] = above;
        }
        let top = self.index(0, col);
        self.cells[top] = Cell::Empty;
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Deep copy kept in round history.
    pub fn snapshot(&self) -> Board {
        self.clone()
    }

    /// Build a board from text rows, top row first: `.` is empty, `1`-`9`
    /// are player numbers.
    #[cfg(test)]
    pub(crate) fn from_rows(rows: &[&str]) -> Board {
        let height = rows.len();
        let width = rows[0].split_whitespace().count();
        let mut board = Board::new(width, height);
        for (row, line) in rows.iter().enumerate() {
            for (col, glyph) in line.split_whitespace().enumerate() {
                if let Ok(number) = glyph.parse::<usize>() {
                    let idx = board.index(row, col);
                    board.cells[idx] = Cell::Occupied(PlayerId::new(number - 1));
                }
            }
        }
        board
    }

    fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.height && col < self.width);
        row * self.width + col
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(7, 6)
    }
}

/// Text rendering: `.` for empty cells, the 1-based player number (`0` for
/// player 10) otherwise.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                let glyph = match self.get(row, col) {
                    Cell::Empty => '.',
                    Cell::Occupied(player) => {
                        char::from_digit((player.number() % 10) as u32, 10).unwrap_or('?')
                    }
                };
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const RED: PlayerId = PlayerId::new(0);
    const YELLOW: PlayerId = PlayerId::new(1);

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(7, 6);
        for row in 0..6 {
            for col in 0..7 {
                assert_eq!(board.get(row, col), Cell::Empty);
            }
        }
        assert_eq!(board.legal_columns().len(), 7);
    }

    #[test]
    fn test_drop_counter() {
        let mut board = Board::new(7, 6);

        let row = board.drop_counter(3, RED).unwrap();
        assert_eq!(row, 5);
        assert_eq!(board.get(5, 3), Cell::Occupied(RED));

        let row = board.drop_counter(3, YELLOW).unwrap();
        assert_eq!(row, 4);
        assert_eq!(board.owner(4, 3), Some(YELLOW));
    }

    #[test]
    fn test_column_full() {
        let mut board = Board::new(7, 6);
        for _ in 0..6 {
            board.drop_counter(0, RED).unwrap();
        }

        assert!(board.is_column_full(0));
        assert_eq!(
            board.drop_counter(0, YELLOW),
            Err(MoveError::ColumnFull { column: 0 })
        );
    }

    #[test]
    fn test_invalid_column() {
        let mut board = Board::new(7, 6);
        assert_eq!(
            board.drop_counter(7, RED),
            Err(MoveError::InvalidColumn { column: 7, width: 7 })
        );
    }

    #[test]
    fn test_drop_fills_hole_left_by_removal() {
        let mut board = Board::new(6, 6);
        for _ in 0..6 {
            board.drop_counter(2, RED).unwrap();
        }
        board.remove(3, 2);
        assert!(!board.is_column_full(2));
        assert_eq!(board.drop_counter(2, YELLOW), Ok(3));
    }

    #[test]
    fn test_remove_out_of_bounds_is_noop() {
        let mut board = Board::new(6, 6);
        board.drop_counter(0, RED).unwrap();
        let before = board.clone();
        board.remove(10, 0);
        board.remove(0, 10);
        assert_eq!(board, before);
    }

    #[test]
    fn test_collapse_shifts_column_down() {
        let mut board = Board::new(6, 6);
        board.drop_counter(1, RED).unwrap(); // row 5
        board.drop_counter(1, YELLOW).unwrap(); // row 4
        board.drop_counter(1, RED).unwrap(); // row 3

        board.collapse(4, 1);
        assert_eq!(board.owner(5, 1), Some(RED));
        assert_eq!(board.owner(4, 1), Some(RED));
        assert_eq!(board.get(3, 1), Cell::Empty);
        assert_eq!(board.occupied_count(), 2);
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::new(7, 6);
        for col in 0..7 {
            for _ in 0..6 {
                board.drop_counter(col, RED).unwrap();
            }
        }
        assert!(board.is_full());
        assert!(board.legal_columns().is_empty());
    }

    #[test]
    fn test_corners() {
        let board = Board::new(7, 6);
        assert!(board.is_corner(0, 0));
        assert!(board.is_corner(0, 6));
        assert!(board.is_corner(5, 0));
        assert!(board.is_corner(5, 6));
        assert!(!board.is_corner(0, 3));
        assert!(!board.is_corner(2, 0));
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut board = Board::new(6, 6);
        board.drop_counter(0, RED).unwrap();
        let snap = board.snapshot();
        board.drop_counter(0, YELLOW).unwrap();
        assert_eq!(snap.occupied_count(), 1);
        assert_eq!(board.occupied_count(), 2);
    }

    #[test]
    fn test_from_rows_matches_display() {
        let rows = [
            ". . . . . .",
            ". . . . . .",
            ". . . . . .",
            ". . . . . .",
            ". 2 . . . .",
            "1 2 . . . 3",
        ];
        let board = Board::from_rows(&rows);
        assert_eq!(board.owner(5, 5), Some(PlayerId::new(2)));
        let text = board.to_string();
        assert_eq!(text.lines().collect::<Vec<_>>(), rows);
    }

    #[test]
    fn test_display() {
        let mut board = Board::new(6, 6);
        board.drop_counter(0, RED).unwrap();
        board.drop_counter(1, YELLOW).unwrap();
        let text = board.to_string();
        assert_eq!(text.lines().count(), 6);
        assert_eq!(text.lines().last(), Some("1 2 . . . ."));
    }

    proptest! {
        #[test]
        fn prop_drop_into_full_column_fails_unchanged(
            width in 6usize..12,
            height in 6usize..12,
            moves in prop::collection::vec((0usize..12, 0usize..3), 0..200),
        ) {
            let mut board = Board::new(width, height);
            for (col, player) in moves {
                let _ = board.drop_counter(col % width, PlayerId::new(player));
            }
            for col in 0..width {
                if board.is_column_full(col) {
                    let before = board.clone();
                    prop_assert!(board.drop_counter(col, PlayerId::new(0)).is_err());
                    prop_assert_eq!(&board, &before);
                }
            }
        }

        #[test]
        fn prop_full_board_rejects_every_column(width in 6usize..10, height in 6usize..10) {
            let mut board = Board::new(width, height);
            for col in 0..width {
                for _ in 0..height {
                    board.drop_counter(col, PlayerId::new(col % 2)).unwrap();
                }
            }
            prop_assert!(board.is_full());
            for col in 0..width {
                prop_assert!(board.drop_counter(col, PlayerId::new(0)).is_err());
            }
        }
    }
}
