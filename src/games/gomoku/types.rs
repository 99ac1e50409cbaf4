//! Core domain types for five-in-a-row.

use serde::{Deserialize, Serialize};

/// Width and height of the grid.
pub const BOARD_SIZE: usize = 15;

/// Number of cells on the grid.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Stones needed in a line to win.
pub const WIN_LENGTH: usize = 5;

/// Stone color. Black always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Stone {
    /// First player.
    Black,
    /// Second player.
    White,
}

impl Stone {
    /// Returns the opponent color.
    pub fn opponent(self) -> Self {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }

    /// Color that owns the move at `index` in a history (even is Black).
    ///
    /// Also the color to move when `index` stones have been played.
    pub fn from_parity(index: usize) -> Self {
        if index % 2 == 0 {
            Stone::Black
        } else {
            Stone::White
        }
    }
}

/// A cell on the grid.
///
/// Encoded on the wire as a small signed integer: 0 empty, -1 black, 1 white.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Cell {
    /// No stone.
    #[default]
    Empty,
    /// Cell holds a stone.
    Occupied(Stone),
}

impl From<Cell> for i8 {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => 0,
            Cell::Occupied(Stone::Black) => -1,
            Cell::Occupied(Stone::White) => 1,
        }
    }
}

impl TryFrom<i8> for Cell {
    type Error = InvalidCell;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Cell::Empty),
            -1 => Ok(Cell::Occupied(Stone::Black)),
            1 => Ok(Cell::Occupied(Stone::White)),
            other => Err(InvalidCell(i64::from(other))),
        }
    }
}

impl TryFrom<i64> for Cell {
    type Error = InvalidCell;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        i8::try_from(value)
            .map_err(|_| InvalidCell(value))
            .and_then(Cell::try_from)
    }
}

/// A cell value outside {-1, 0, 1}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Invalid cell value {}", _0)]
pub struct InvalidCell(#[error(not(source))] pub i64);

/// 15x15 board, row-major. Index `i` is column `i % 15`, row `i / 15`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; CELL_COUNT],
        }
    }

    /// Builds a board from exactly 225 cells.
    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Self { cells }
    }

    /// Gets the cell at `pos`, or `None` when off the grid.
    pub fn get(&self, pos: usize) -> Option<Cell> {
        self.cells.get(pos).copied()
    }

    /// Checks if the cell at `pos` is on the grid and empty.
    pub fn is_empty(&self, pos: usize) -> bool {
        matches!(self.get(pos), Some(Cell::Empty))
    }

    /// Sets the cell at `pos`. Positions off the grid are ignored.
    pub(crate) fn set(&mut self, pos: usize, cell: Cell) {
        if let Some(slot) = self.cells.get_mut(pos) {
            *slot = cell;
        }
    }

    /// Returns all cells.
    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Cells in wire encoding.
    pub fn to_wire(&self) -> Vec<i8> {
        self.cells.iter().map(|&c| i8::from(c)).collect()
    }

    /// Formats the board as text, marking `highlight` cells.
    ///
    /// Columns are lettered `a`..`o`, rows numbered 1..15 from the top.
    pub fn display(&self, highlight: &[usize]) -> String {
        let mut result = String::from("   ");
        for col in 0..BOARD_SIZE {
            result.push(' ');
            result.push(column_label(col));
        }
        result.push('\n');

        for row in 0..BOARD_SIZE {
            result.push_str(&format!("{:>2} ", row + 1));
            for col in 0..BOARD_SIZE {
                let pos = row * BOARD_SIZE + col;
                let lit = highlight.contains(&pos);
                let symbol = match (self.cells[pos], lit) {
                    (Cell::Empty, _) => '.',
                    (Cell::Occupied(Stone::Black), false) => 'x',
                    (Cell::Occupied(Stone::Black), true) => 'X',
                    (Cell::Occupied(Stone::White), false) => 'o',
                    (Cell::Occupied(Stone::White), true) => 'O',
                };
                result.push(' ');
                result.push(symbol);
            }
            if row + 1 < BOARD_SIZE {
                result.push('\n');
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Letter used for a column in [`Board::display`].
pub fn column_label(col: usize) -> char {
    (b'a' + (col % BOARD_SIZE) as u8) as char
}

/// Board index for a column and row, if both are on the grid.
pub fn index_of(col: usize, row: usize) -> Option<usize> {
    (col < BOARD_SIZE && row < BOARD_SIZE).then_some(row * BOARD_SIZE + col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_wire_encoding() {
        assert_eq!(i8::from(Cell::Empty), 0);
        assert_eq!(i8::from(Cell::Occupied(Stone::Black)), -1);
        assert_eq!(i8::from(Cell::Occupied(Stone::White)), 1);
        assert_eq!(Cell::try_from(2i8), Err(InvalidCell(2)));
        assert_eq!(Cell::try_from(300i64), Err(InvalidCell(300)));
    }

    #[test]
    fn test_cell_serde_uses_integers() {
        let json = serde_json::to_string(&[Cell::Occupied(Stone::Black), Cell::Empty]).unwrap();
        assert_eq!(json, "[-1,0]");
        assert!(serde_json::from_str::<Cell>("7").is_err());
    }

    #[test]
    fn test_parity() {
        assert_eq!(Stone::from_parity(0), Stone::Black);
        assert_eq!(Stone::from_parity(1), Stone::White);
        assert_eq!(Stone::from_parity(224), Stone::Black);
    }

    #[test]
    fn test_index_of() {
        assert_eq!(index_of(7, 7), Some(112));
        assert_eq!(index_of(14, 0), Some(14));
        assert_eq!(index_of(15, 0), None);
    }

    #[test]
    fn test_display_marks_highlight() {
        let mut board = Board::new();
        board.set(0, Cell::Occupied(Stone::Black));
        board.set(1, Cell::Occupied(Stone::White));
        let text = board.display(&[1]);
        let first_row = text.lines().nth(1).unwrap();
        assert!(first_row.starts_with(" 1  x O ."));
    }
}
