//! Remote room stores.
//!
//! A store is a dumb holder of one JSON blob per room. Every read and write
//! moves the whole document; there is no versioning and no merge, so the
//! last write to land wins.

use super::document::RoomDocument;
use super::error::SyncError;
use crate::room::RoomId;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument};

/// The three verbs of the room document protocol.
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Fetches the room document, `None` when the room has none.
    async fn fetch(&self, room: RoomId) -> Result<Option<serde_json::Value>, SyncError>;

    /// Overwrites the room document.
    async fn replace(&self, room: RoomId, document: &RoomDocument) -> Result<(), SyncError>;

    /// Removes the room document.
    async fn delete(&self, room: RoomId) -> Result<(), SyncError>;
}

#[async_trait]
impl<S: RoomStore + ?Sized> RoomStore for Arc<S> {
    async fn fetch(&self, room: RoomId) -> Result<Option<serde_json::Value>, SyncError> {
        (**self).fetch(room).await
    }

    async fn replace(&self, room: RoomId, document: &RoomDocument) -> Result<(), SyncError> {
        (**self).replace(room, document).await
    }

    async fn delete(&self, room: RoomId) -> Result<(), SyncError> {
        (**self).delete(room).await
    }
}

/// Store reached over HTTP, addressed as `{base_url}/room/{id}.json`.
#[derive(Debug, Clone)]
pub struct HttpRoomStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRoomStore {
    /// Creates a store client rooted at `base_url`.
    #[instrument]
    pub fn new(base_url: String) -> Self {
        info!(base_url = %base_url, "Creating HTTP room store client");
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RoomStore for HttpRoomStore {
    #[instrument(skip(self), fields(room = %room))]
    async fn fetch(&self, room: RoomId) -> Result<Option<serde_json::Value>, SyncError> {
        let url = room.document_url(&self.base_url);
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Room document not found");
            return Ok(None);
        }

        let value: serde_json::Value = response.error_for_status()?.json().await?;
        debug!(present = !value.is_null(), "Fetched room document");
        Ok((!value.is_null()).then_some(value))
    }

    #[instrument(skip(self, document), fields(room = %room, moves = document.history.len()))]
    async fn replace(&self, room: RoomId, document: &RoomDocument) -> Result<(), SyncError> {
        let url = room.document_url(&self.base_url);
        self.client
            .patch(&url)
            .json(document)
            .send()
            .await?
            .error_for_status()?;
        debug!("Replaced room document");
        Ok(())
    }

    #[instrument(skip(self), fields(room = %room))]
    async fn delete(&self, room: RoomId) -> Result<(), SyncError> {
        let url = room.document_url(&self.base_url);
        self.client.delete(&url).send().await?.error_for_status()?;
        debug!("Deleted room document");
        Ok(())
    }
}

/// In-process store shared by every clone.
///
/// Backs local play, the room store server, and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryRoomStore {
    rooms: Arc<Mutex<HashMap<RoomId, serde_json::Value>>>,
}

impl MemoryRoomStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    fn rooms(&self) -> MutexGuard<'_, HashMap<RoomId, serde_json::Value>> {
        self.rooms.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the stored value for a room.
    pub fn get(&self, room: RoomId) -> Option<serde_json::Value> {
        self.rooms().get(&room).cloned()
    }

    /// Stores `value` as the whole room document.
    #[instrument(skip(self, value))]
    pub fn put(&self, room: RoomId, value: serde_json::Value) {
        self.rooms().insert(room, value);
    }

    /// Shallow-merges the top-level keys of `patch` into the room document.
    ///
    /// Returns the merged document, or `None` if `patch` is not an object.
    #[instrument(skip(self, patch))]
    pub fn merge(&self, room: RoomId, patch: serde_json::Value) -> Option<serde_json::Value> {
        let serde_json::Value::Object(fields) = patch else {
            return None;
        };
        let mut rooms = self.rooms();
        let entry = rooms
            .entry(room)
            .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
        if !entry.is_object() {
            *entry = serde_json::Value::Object(serde_json::Map::new());
        }
        if let serde_json::Value::Object(existing) = entry {
            existing.extend(fields);
        }
        Some(entry.clone())
    }

    /// Removes the room document. Returns whether one existed.
    #[instrument(skip(self))]
    pub fn remove(&self, room: RoomId) -> bool {
        self.rooms().remove(&room).is_some()
    }

    /// Lists rooms that currently hold a document.
    pub fn rooms_in_use(&self) -> Vec<RoomId> {
        let mut ids: Vec<_> = self.rooms().keys().copied().collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    async fn fetch(&self, room: RoomId) -> Result<Option<serde_json::Value>, SyncError> {
        Ok(self.get(room))
    }

    async fn replace(&self, room: RoomId, document: &RoomDocument) -> Result<(), SyncError> {
        let value = serde_json::to_value(document)?;
        self.merge(room, value);
        Ok(())
    }

    async fn delete(&self, room: RoomId) -> Result<(), SyncError> {
        self.remove(room);
        Ok(())
    }
}
