//! First-class user intents for five-in-a-row.
//!
//! Intents are what the front-end asks for. The engine decides whether
//! they change anything; rejected intents are silent no-ops.

use serde::{Deserialize, Serialize};

/// A request from the player driving this replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Place the current turn's stone at a board index.
    Place(usize),
    /// Take back the most recent stone.
    Undo,
    /// Clear the board and the shared room document.
    Reset,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::Place(pos) => write!(f, "place {}", pos),
            Intent::Undo => write!(f, "undo"),
            Intent::Reset => write!(f, "reset"),
        }
    }
}

/// Why an intent left the game unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    /// Index is not on the 15x15 grid.
    #[display("Position {} is off the board", _0)]
    OutOfRange(#[error(not(source))] usize),

    /// The cell already holds a stone.
    #[display("Position {} is already occupied", _0)]
    Occupied(#[error(not(source))] usize),

    /// A winner is set; only reset is accepted.
    #[display("Game is already over")]
    GameOver,

    /// History is empty.
    #[display("No move to take back")]
    NothingToUndo,
}
