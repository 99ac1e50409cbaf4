//! Win detection for five-in-a-row.
//!
//! Only the side that just moved can have created a line, so only its
//! stones are scanned as line starts.

use super::super::types::{BOARD_SIZE, CELL_COUNT, Stone, WIN_LENGTH};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::instrument;

/// A certified five-in-a-row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Victory {
    /// Side that owns the line.
    pub winner: Stone,
    /// The five board indices, in scan order.
    pub line: [usize; WIN_LENGTH],
}

/// One of the four line directions on the flattened grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Horizontal,
    AntiDiagonal,
    Vertical,
    Diagonal,
}

impl Direction {
    /// Scan order.
    const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::AntiDiagonal,
        Direction::Vertical,
        Direction::Diagonal,
    ];

    /// Index delta for one step.
    fn offset(self) -> usize {
        match self {
            Direction::Horizontal => 1,
            Direction::AntiDiagonal => BOARD_SIZE - 1,
            Direction::Vertical => BOARD_SIZE,
            Direction::Diagonal => BOARD_SIZE + 1,
        }
    }

    /// Whether a five-cell span starting at `pos` stays on the grid.
    ///
    /// Rejecting here is what keeps a flattened offset from wrapping into
    /// the next row. Positions off the grid never fit.
    fn fits(self, pos: usize) -> bool {
        if pos >= CELL_COUNT {
            return false;
        }
        let span = WIN_LENGTH - 1;
        let last = BOARD_SIZE - 1;
        let x = pos % BOARD_SIZE;
        let y = pos / BOARD_SIZE;
        match self {
            Direction::Horizontal => x + span <= last,
            Direction::AntiDiagonal => x >= span && y + span <= last,
            Direction::Vertical => y + span <= last,
            Direction::Diagonal => x + span <= last && y + span <= last,
        }
    }
}

/// Checks whether the side that made the last move has five in a row.
///
/// `turn` is the side to move next, so the mover is its opponent. Returns
/// `None` when there is no line, which callers use to clear a stale winner.
#[instrument(skip(history), fields(moves = history.len()))]
pub fn detect_win(history: &[usize], turn: Stone) -> Option<Victory> {
    let mover = turn.opponent();
    let stones: Vec<usize> = history
        .iter()
        .enumerate()
        .filter(|(k, _)| Stone::from_parity(*k) == mover)
        .map(|(_, &pos)| pos)
        .collect();
    let owned: HashSet<usize> = stones.iter().copied().collect();

    for &start in &stones {
        for direction in Direction::ALL {
            if !direction.fits(start) {
                continue;
            }
            let step = direction.offset();
            let line: [usize; WIN_LENGTH] = std::array::from_fn(|k| start + k * step);
            if line.iter().all(|pos| owned.contains(pos)) {
                tracing::debug!(winner = %mover, ?line, "Five in a row");
                return Some(Victory {
                    winner: mover,
                    line,
                });
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Interleaves `black` and `white` into a history, Black first.
    fn history_of(black: &[usize], white: &[usize]) -> Vec<usize> {
        let mut history = Vec::new();
        for k in 0..black.len().max(white.len()) {
            if let Some(&b) = black.get(k) {
                history.push(b);
            }
            if let Some(&w) = white.get(k) {
                history.push(w);
            }
        }
        history
    }

    #[test]
    fn test_no_winner_empty_history() {
        assert_eq!(detect_win(&[], Stone::Black), None);
    }

    #[test]
    fn test_vertical_line() {
        let history = history_of(&[3, 18, 33, 48, 63], &[0, 1, 2, 4]);
        let victory = detect_win(&history, Stone::White).unwrap();
        assert_eq!(victory.winner, Stone::Black);
        assert_eq!(victory.line, [3, 18, 33, 48, 63]);
    }

    #[test]
    fn test_diagonal_line() {
        let history = history_of(&[0, 16, 32, 48, 64], &[1, 2, 3, 4]);
        let victory = detect_win(&history, Stone::White).unwrap();
        assert_eq!(victory.line, [0, 16, 32, 48, 64]);
    }

    #[test]
    fn test_anti_diagonal_line() {
        // Starts at column 4, row 0 and walks down-left to column 0, row 4.
        let history = history_of(&[4, 18, 32, 46, 60], &[100, 101, 102, 103]);
        let victory = detect_win(&history, Stone::White).unwrap();
        assert_eq!(victory.line, [4, 18, 32, 46, 60]);
    }

    #[test]
    fn test_anti_diagonal_rejected_near_left_edge() {
        // 59 is column 14, so the path leaves the grid on the left.
        let history = history_of(&[3, 17, 31, 45, 59], &[100, 101, 102, 103]);
        assert_eq!(detect_win(&history, Stone::White), None);
    }

    #[test]
    fn test_only_mover_is_scanned() {
        // White holds a line but Black just moved.
        let history = history_of(&[200, 201, 202, 203, 220], &[0, 1, 2, 3, 4]);
        assert_eq!(history.len(), 10);
        assert_eq!(detect_win(&history[..9], Stone::White), None);
        let victory = detect_win(&history, Stone::Black).unwrap();
        assert_eq!(victory.winner, Stone::White);
    }

    #[test]
    fn test_horizontal_wrap_is_not_a_line() {
        // Columns 12-14 of row 0 followed by columns 0-1 of row 1.
        let history = history_of(&[12, 13, 14, 15, 16], &[100, 101, 102, 103]);
        assert_eq!(detect_win(&history, Stone::White), None);
    }

    #[test]
    fn test_direction_bounds() {
        assert!(Direction::Horizontal.fits(10));
        assert!(!Direction::Horizontal.fits(11));
        assert!(Direction::Vertical.fits(10 * BOARD_SIZE));
        assert!(!Direction::Vertical.fits(11 * BOARD_SIZE));
        assert!(!Direction::AntiDiagonal.fits(3));
        assert!(Direction::AntiDiagonal.fits(4));
        assert!(!Direction::Diagonal.fits(11));
        assert!(!Direction::Diagonal.fits(11 * BOARD_SIZE));
        assert!(Direction::AntiDiagonal.fits(10 * BOARD_SIZE + 4));
        assert!(!Direction::AntiDiagonal.fits(11 * BOARD_SIZE + 4));
        assert!(!Direction::AntiDiagonal.fits(11 * BOARD_SIZE + 14));
        assert!(!Direction::Vertical.fits(11 * BOARD_SIZE + 7));
        assert!(!Direction::Vertical.fits(14 * BOARD_SIZE + 14));
    }

    #[test]
    fn test_off_grid_positions_never_fit() {
        for direction in Direction::ALL {
            assert!(!direction.fits(CELL_COUNT));
            assert!(!direction.fits(usize::MAX));
        }
        assert_eq!(detect_win(&[usize::MAX], Stone::White), None);
        assert_eq!(
            detect_win(&[usize::MAX - 1, 0, usize::MAX - 2], Stone::White),
            None
        );
    }

    #[test]
    fn test_anti_diagonal_rejected_near_bottom_edge() {
        // Starts at column 4, row 11; a full line would need rows 11-15.
        let start = 11 * BOARD_SIZE + 4;
        let black: Vec<usize> = (0..5).map(|k| start + k * (BOARD_SIZE - 1)).collect();
        assert!(black.iter().any(|&pos| pos >= CELL_COUNT));
        let history = history_of(&black, &[0, 1, 2, 3]);
        assert_eq!(detect_win(&history, Stone::White), None);

        // The same line one row higher ends on row 14 and wins.
        let start = 10 * BOARD_SIZE + 4;
        let black: Vec<usize> = (0..5).map(|k| start + k * (BOARD_SIZE - 1)).collect();
        let history = history_of(&black, &[0, 1, 2, 3]);
        let victory = detect_win(&history, Stone::White).unwrap();
        assert_eq!(victory.line[4], 14 * BOARD_SIZE);
    }
}
