//! Room synchronization.
//!
//! Replicas share a game by polling one JSON document per room and writing
//! the whole document back after each local change. There is no locking and
//! no versioning: the last write to land wins.

pub mod client;
pub mod coordinator;
pub mod document;
pub mod error;
pub mod store;

pub use client::{ClientHandle, DEFAULT_POLL_INTERVAL, RoomClient};
pub use coordinator::SyncCoordinator;
pub use document::{CorruptState, RoomDocument};
pub use error::SyncError;
pub use store::{HttpRoomStore, MemoryRoomStore, RoomStore};
