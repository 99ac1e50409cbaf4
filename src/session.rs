//! Per-room game session.
//!
//! A session is the context object a front-end and the sync coordinator
//! share: it owns the engine for one room and the handshake deciding when a
//! local change has to be written back to the store.

use crate::games::gomoku::{Board, Game, GameStatus, Intent, Stone};
use crate::room::RoomId;
use crate::sync::document::{RoomDocument, decode};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Whether a local change is waiting to be written to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PushState {
    /// Store already reflects everything this replica changed.
    #[default]
    Clean,
    /// A local place or undo has not been written yet.
    DirtyPendingPush,
}

/// A write the session wants sent to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Overwrite the room document.
    Replace(RoomDocument),
    /// Remove the room document.
    Delete,
}

/// Read-only view of a session for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameView {
    /// Room this view belongs to.
    pub room: RoomId,
    /// Current board.
    pub board: Board,
    /// Moves in play order.
    pub history: Vec<usize>,
    /// Side to move.
    pub turn: Stone,
    /// Phase of the game.
    pub status: GameStatus,
    /// Winner, if any.
    pub winner: Option<Stone>,
    /// Winning line; empty without a winner.
    pub winning_line: Vec<usize>,
}

/// One replica of one room's game.
#[derive(Debug, Clone)]
pub struct GameSession {
    room: RoomId,
    game: Game,
    push: PushState,
    delete_pending: bool,
}

impl GameSession {
    /// Creates an empty session for `room`.
    #[instrument]
    pub fn new(room: RoomId) -> Self {
        info!(room = %room, "Creating game session");
        Self {
            room,
            game: Game::new(),
            push: PushState::Clean,
            delete_pending: false,
        }
    }

    /// Returns the room.
    pub fn room(&self) -> RoomId {
        self.room
    }

    /// Returns the engine.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Returns the push handshake state.
    pub fn push_state(&self) -> PushState {
        self.push
    }

    /// Applies a local intent. Returns whether the game changed.
    ///
    /// Taking back the only stone on the board is treated as a reset, so the
    /// room document is deleted instead of left holding that stone.
    #[instrument(skip(self), fields(room = %self.room))]
    pub fn dispatch(&mut self, intent: Intent) -> bool {
        let intent = match intent {
            Intent::Undo if self.game.history().len() == 1 => {
                debug!("Undo of the only stone becomes a reset");
                Intent::Reset
            }
            other => other,
        };

        match intent {
            Intent::Place(_) | Intent::Undo => {
                let changed = self.game.apply(intent);
                if changed {
                    self.push = PushState::DirtyPendingPush;
                }
                changed
            }
            Intent::Reset => {
                let changed = self.game.apply(intent);
                self.push = PushState::Clean;
                self.delete_pending = true;
                changed
            }
        }
    }

    /// Reconciles with a fetched room document.
    ///
    /// Absent or corrupt documents reset the replica. A pull never schedules
    /// a write, and it discards a write still pending, since the replica now
    /// mirrors the store.
    #[instrument(skip(self, value), fields(room = %self.room, present = value.is_some()))]
    pub fn apply_pull(&mut self, value: Option<serde_json::Value>) {
        match decode(value) {
            Some(snapshot) => {
                debug!(moves = snapshot.history().len(), "Adopting remote state");
                self.game.set_state(snapshot);
            }
            None => self.game.reset(),
        }
        self.push = PushState::Clean;
    }

    /// Takes the next write for the store, if any.
    ///
    /// A scheduled delete wins over a pending replace. A replace is only
    /// produced while moves are on the board. Either way the handshake
    /// returns to [`PushState::Clean`].
    pub fn take_outbound(&mut self) -> Option<Outbound> {
        if std::mem::take(&mut self.delete_pending) {
            self.push = PushState::Clean;
            return Some(Outbound::Delete);
        }

        match std::mem::take(&mut self.push) {
            PushState::DirtyPendingPush if !self.game.history().is_empty() => {
                Some(Outbound::Replace(RoomDocument::from_game(&self.game)))
            }
            _ => None,
        }
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> GameView {
        GameView {
            room: self.room,
            board: self.game.board().clone(),
            history: self.game.history().to_vec(),
            turn: self.game.turn(),
            status: self.game.status(),
            winner: self.game.winner(),
            winning_line: self.game.winning_line().to_vec(),
        }
    }
}
