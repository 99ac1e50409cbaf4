//! Go Five library - two-player five-in-a-row with shared rooms
//!
//! Two players share a game either on one machine or through a room
//! document that every replica polls and overwrites.
//!
//! # Architecture
//!
//! - **Games**: the five-in-a-row engine and win detector
//! - **Session**: per-room context owning the engine and the push handshake
//! - **Sync**: room stores, the pull/push coordinator and the polling client
//! - **Server**: a room store speaking the same document protocol
//!
//! # Example
//!
//! ```no_run
//! use go_five::{Intent, MemoryRoomStore, RoomClient, RoomId};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = Arc::new(MemoryRoomStore::new());
//! let handle = RoomClient::spawn(RoomId::new(42)?, store, Duration::from_millis(2000));
//! handle.send(Intent::Place(112));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
mod config;
pub mod console;
mod games;
mod room;
pub mod server;
mod session;
pub mod sync;

// Crate-level exports - Configuration
pub use config::{BASE_URL_VAR, ClientConfig, ConfigError, ROOM_VAR};

// Crate-level exports - Rooms
pub use room::{ROOM_LIMIT, RoomError, RoomId};

// Crate-level exports - Session management
pub use session::{GameSession, GameView, Outbound, PushState};

// Crate-level exports - Sync
pub use sync::{
    ClientHandle, CorruptState, DEFAULT_POLL_INTERVAL, HttpRoomStore, MemoryRoomStore, RoomClient,
    RoomDocument, RoomStore, SyncCoordinator, SyncError,
};

// Crate-level exports - Game types (five-in-a-row)
pub use games::gomoku::{
    BOARD_SIZE, Board, CELL_COUNT, Cell, Game, GameStatus, Intent, InvalidCell, MoveError, Snapshot,
    Stone, Victory, WIN_LENGTH, column_label, detect_win, index_of,
};
