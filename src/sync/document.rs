//! Wire format of a room document.
//!
//! The store holds `{board: int[225], history: int[]}` as an opaque blob.
//! Inbound documents are checked here before they reach the engine; anything
//! that does not describe a playable board is reported as [`CorruptState`].

use crate::games::gomoku::{Board, CELL_COUNT, Cell, Game, Snapshot};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{instrument, warn};

/// The shared document for one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDocument {
    /// Cells in wire encoding, row-major.
    #[serde(default)]
    pub board: Vec<i64>,
    /// Moves in play order. The store may drop an empty list entirely.
    #[serde(default)]
    pub history: Vec<i64>,
}

impl RoomDocument {
    /// Captures the full board and history of a game.
    pub fn from_game(game: &Game) -> Self {
        Self {
            board: game.board().to_wire().into_iter().map(i64::from).collect(),
            history: game.history().iter().map(|&pos| pos as i64).collect(),
        }
    }

    /// Parses a fetched JSON value.
    ///
    /// `null` means the room has no document.
    #[instrument(skip(value))]
    pub fn from_value(value: serde_json::Value) -> Result<Option<Self>, CorruptState> {
        if value.is_null() {
            return Ok(None);
        }
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| CorruptState::Malformed(e.to_string()))
    }

    /// Validates the document into a snapshot the engine can trust.
    #[instrument(skip(self), fields(cells = self.board.len(), moves = self.history.len()))]
    pub fn into_snapshot(self) -> Result<Snapshot, CorruptState> {
        if self.board.len() != CELL_COUNT {
            return Err(CorruptState::BoardLength(self.board.len()));
        }
        let mut cells = [Cell::Empty; CELL_COUNT];
        for (index, (slot, &value)) in cells.iter_mut().zip(&self.board).enumerate() {
            *slot = Cell::try_from(value).map_err(|_| CorruptState::InvalidCell { index, value })?;
        }

        if self.history.len() > CELL_COUNT {
            return Err(CorruptState::TooManyMoves(self.history.len()));
        }
        let mut seen = HashSet::with_capacity(self.history.len());
        let mut history = Vec::with_capacity(self.history.len());
        for &raw in &self.history {
            let pos = usize::try_from(raw)
                .ok()
                .filter(|&pos| pos < CELL_COUNT)
                .ok_or(CorruptState::MoveOutOfRange(raw))?;
            if !seen.insert(pos) {
                return Err(CorruptState::DuplicateMove(pos));
            }
            history.push(pos);
        }

        Ok(Snapshot::new(Board::from_cells(cells), history))
    }
}

/// Decodes a fetched value into a snapshot.
///
/// Absent and corrupt documents both come back as `None`; corruption is
/// logged so the caller can fall back to an empty game.
pub fn decode(value: Option<serde_json::Value>) -> Option<Snapshot> {
    let document = match value.map(RoomDocument::from_value) {
        None | Some(Ok(None)) => return None,
        Some(Ok(Some(document))) => document,
        Some(Err(e)) => {
            warn!(error = %e, "Discarding corrupt room document");
            return None;
        }
    };

    match document.into_snapshot() {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            warn!(error = %e, "Discarding corrupt room document");
            None
        }
    }
}

/// A fetched document that does not describe a playable game.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CorruptState {
    /// Not shaped like `{board, history}` with integer entries.
    #[display("Malformed document: {}", _0)]
    Malformed(#[error(not(source))] String),

    /// Board does not have 225 cells.
    #[display("Board has {} cells", _0)]
    BoardLength(#[error(not(source))] usize),

    /// A cell holds something other than -1, 0 or 1.
    #[display("Cell {} holds {}", index, value)]
    InvalidCell {
        /// Board index of the cell.
        index: usize,
        /// Value found there.
        value: i64,
    },

    /// History is longer than the board.
    #[display("History has {} moves", _0)]
    TooManyMoves(#[error(not(source))] usize),

    /// History entry outside the board.
    #[display("Move {} is off the board", _0)]
    MoveOutOfRange(#[error(not(source))] i64),

    /// History entry repeated.
    #[display("Move {} appears twice", _0)]
    DuplicateMove(#[error(not(source))] usize),
}
