//! Game engine for five-in-a-row.
//!
//! The engine is a reducer over a board and its move history. Turn is never
//! stored: it is always derived from the history length. The outcome is
//! recomputed after every history change.

use super::action::{Intent, MoveError};
use super::rules::{Victory, detect_win};
use super::types::{Board, CELL_COUNT, Cell, Stone};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Which phase of the game a replica is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// No stones on the board.
    Empty,
    /// Stones placed, no line yet.
    InProgress,
    /// A side has five in a row; only reset is accepted.
    Won(Stone),
}

/// A board and history pair accepted for wholesale replacement.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters, derive_new::new)]
pub struct Snapshot {
    /// Cells of the replacement board.
    board: Board,
    /// Moves in play order.
    history: Vec<usize>,
}

/// Five-in-a-row game engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    history: Vec<usize>,
    victory: Option<Victory>,
}

impl Game {
    /// Creates an empty game with Black to move.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            history: Vec::new(),
            victory: None,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the move history.
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    /// Side to move, derived from history length.
    pub fn turn(&self) -> Stone {
        Stone::from_parity(self.history.len())
    }

    /// Returns the certified line, if any.
    pub fn victory(&self) -> Option<&Victory> {
        self.victory.as_ref()
    }

    /// Returns the winner, if any.
    pub fn winner(&self) -> Option<Stone> {
        self.victory.map(|v| v.winner)
    }

    /// Winning line for presentation; empty when there is no winner.
    pub fn winning_line(&self) -> &[usize] {
        match &self.victory {
            Some(victory) => &victory.line,
            None => &[],
        }
    }

    /// Returns the current phase.
    pub fn status(&self) -> GameStatus {
        match (&self.victory, self.history.is_empty()) {
            (Some(victory), _) => GameStatus::Won(victory.winner),
            (None, true) => GameStatus::Empty,
            (None, false) => GameStatus::InProgress,
        }
    }

    /// Checks whether a stone could be placed at `pos`.
    pub fn check_place(&self, pos: usize) -> Result<(), MoveError> {
        if self.victory.is_some() {
            return Err(MoveError::GameOver);
        }
        if pos >= CELL_COUNT {
            return Err(MoveError::OutOfRange(pos));
        }
        if !self.board.is_empty(pos) {
            return Err(MoveError::Occupied(pos));
        }
        Ok(())
    }

    /// Checks whether the last stone could be taken back.
    pub fn check_undo(&self) -> Result<(), MoveError> {
        if self.victory.is_some() {
            return Err(MoveError::GameOver);
        }
        if self.history.is_empty() {
            return Err(MoveError::NothingToUndo);
        }
        Ok(())
    }

    /// Places the current turn's stone at `pos`.
    ///
    /// Illegal placements are ignored. Returns whether the game changed.
    #[instrument(skip(self), fields(turn = %self.turn()))]
    pub fn place(&mut self, pos: usize) -> bool {
        if let Err(e) = self.check_place(pos) {
            debug!(error = %e, "Placement ignored");
            return false;
        }

        self.board.set(pos, Cell::Occupied(self.turn()));
        self.history.push(pos);
        self.refresh_outcome();
        true
    }

    /// Takes back the most recent stone.
    ///
    /// Ignored when the history is empty or a winner is set. Returns whether
    /// the game changed.
    #[instrument(skip(self), fields(moves = self.history.len()))]
    pub fn undo(&mut self) -> bool {
        if let Err(e) = self.check_undo() {
            debug!(error = %e, "Undo ignored");
            return false;
        }

        if let Some(pos) = self.history.pop() {
            self.board.set(pos, Cell::Empty);
        }
        self.refresh_outcome();
        true
    }

    /// Clears board, history and outcome. Black moves next.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Replaces board and history wholesale.
    ///
    /// The snapshot is trusted; turn follows from its history length and the
    /// outcome is recomputed immediately, clearing any stale winner.
    #[instrument(skip(self, snapshot), fields(moves = snapshot.history.len()))]
    pub fn set_state(&mut self, snapshot: Snapshot) {
        self.board = snapshot.board;
        self.history = snapshot.history;
        self.refresh_outcome();
    }

    /// Snapshot of the current board and history.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.board.clone(), self.history.clone())
    }

    /// Applies an intent to the engine. Returns whether the game changed.
    pub fn apply(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::Place(pos) => self.place(pos),
            Intent::Undo => self.undo(),
            Intent::Reset => {
                let changed = !self.history.is_empty();
                self.reset();
                changed
            }
        }
    }

    fn refresh_outcome(&mut self) {
        self.victory = detect_win(&self.history, self.turn());
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_alternates_colors() {
        let mut game = Game::new();
        assert!(game.place(0));
        assert!(game.place(1));
        assert_eq!(game.board().get(0), Some(Cell::Occupied(Stone::Black)));
        assert_eq!(game.board().get(1), Some(Cell::Occupied(Stone::White)));
        assert_eq!(game.turn(), Stone::Black);
    }

    #[test]
    fn test_illegal_place_is_noop() {
        let mut game = Game::new();
        game.place(7);
        let before = game.clone();
        assert!(!game.place(7));
        assert!(!game.place(CELL_COUNT));
        assert_eq!(game, before);
        assert_eq!(game.check_place(7), Err(MoveError::Occupied(7)));
        assert_eq!(game.check_place(225), Err(MoveError::OutOfRange(225)));
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut game = Game::new();
        assert!(!game.undo());
        assert_eq!(game.check_undo(), Err(MoveError::NothingToUndo));
    }

    #[test]
    fn test_status_transitions() {
        let mut game = Game::new();
        assert_eq!(game.status(), GameStatus::Empty);
        for (k, pos) in [0, 15, 1, 16, 2, 17, 3, 18, 4].into_iter().enumerate() {
            assert!(game.place(pos), "move {} rejected", k);
        }
        assert_eq!(game.status(), GameStatus::Won(Stone::Black));
        assert_eq!(game.winning_line(), &[0, 1, 2, 3, 4]);
        assert!(!game.undo());
        assert!(!game.place(100));
        game.reset();
        assert_eq!(game.status(), GameStatus::Empty);
    }

    #[test]
    fn test_set_state_clears_stale_winner() {
        let mut game = Game::new();
        for pos in [0, 15, 1, 16, 2, 17, 3, 18, 4] {
            game.place(pos);
        }
        assert!(game.winner().is_some());

        let mut board = Board::new();
        board.set(0, Cell::Occupied(Stone::Black));
        game.set_state(Snapshot::new(board, vec![0]));
        assert_eq!(game.winner(), None);
        assert!(game.winning_line().is_empty());
        assert_eq!(game.turn(), Stone::White);
    }
}
