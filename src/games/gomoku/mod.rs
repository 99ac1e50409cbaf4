mod action;
mod game;
mod rules;
mod types;

pub use action::{Intent, MoveError};
pub use game::{Game, GameStatus, Snapshot};
pub use rules::{Victory, detect_win};
pub use types::{
    BOARD_SIZE, Board, CELL_COUNT, Cell, InvalidCell, Stone, WIN_LENGTH, column_label, index_of,
};
