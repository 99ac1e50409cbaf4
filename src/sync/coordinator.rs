//! Pull and push between a session and its room store.
//!
//! Network failures never reach the caller: they are logged and the next
//! poll is the retry.

use super::store::RoomStore;
use crate::games::gomoku::Intent;
use crate::room::RoomId;
use crate::session::{GameSession, Outbound};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Moves documents between one [`GameSession`] and a [`RoomStore`].
#[derive(Debug)]
pub struct SyncCoordinator<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for SyncCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: RoomStore + ?Sized> SyncCoordinator<S> {
    /// Creates a coordinator over `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Fetches the room document and applies it to `session`.
    ///
    /// On a failed fetch the session is left untouched.
    #[instrument(skip(self, session), fields(room = %session.room()))]
    pub async fn pull(&self, session: &mut GameSession) {
        if let Some(value) = self.fetch(session.room()).await {
            session.apply_pull(value);
        }
    }

    /// Fetches the raw room document for a later [`GameSession::apply_pull`].
    ///
    /// Returns `None` when the fetch failed; `Some(None)` is an absent room.
    #[instrument(skip(self))]
    pub async fn fetch(&self, room: RoomId) -> Option<Option<serde_json::Value>> {
        match self.store.fetch(room).await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "Pull failed, waiting for next poll");
                None
            }
        }
    }

    /// Sends the session's pending write, if it has one.
    #[instrument(skip(self, session), fields(room = %session.room()))]
    pub async fn push(&self, session: &mut GameSession) {
        if let Some(outbound) = session.take_outbound() {
            self.send(session.room(), outbound).await;
        }
    }

    /// Resets the session and deletes the room document.
    #[instrument(skip(self, session), fields(room = %session.room()))]
    pub async fn quit(&self, session: &mut GameSession) {
        session.dispatch(Intent::Reset);
        self.push(session).await;
    }

    /// Sends one write. Used by callers that queue writes away from the
    /// session.
    pub async fn send(&self, room: RoomId, outbound: Outbound) {
        let result = match &outbound {
            Outbound::Replace(document) => self.store.replace(room, document).await,
            Outbound::Delete => self.store.delete(room).await,
        };
        match result {
            Ok(()) => debug!(
                room = %room,
                delete = matches!(outbound, Outbound::Delete),
                "Write landed"
            ),
            Err(e) => warn!(room = %room, error = %e, "Write failed, dropping it"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::document::RoomDocument;
    use crate::sync::error::SyncError;
    use crate::sync::store::MemoryRoomStore;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl RoomStore for Unreachable {
        async fn fetch(&self, _room: RoomId) -> Result<Option<serde_json::Value>, SyncError> {
            Err(SyncError::new("connection refused"))
        }

        async fn replace(&self, _room: RoomId, _document: &RoomDocument) -> Result<(), SyncError> {
            Err(SyncError::new("connection refused"))
        }

        async fn delete(&self, _room: RoomId) -> Result<(), SyncError> {
            Err(SyncError::new("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_failures_are_swallowed() {
        let coordinator = SyncCoordinator::new(Arc::new(Unreachable));
        let mut session = GameSession::new(RoomId::DEFAULT);
        session.dispatch(Intent::Place(10));

        coordinator.push(&mut session).await;
        coordinator.pull(&mut session).await;

        assert_eq!(session.game().history(), &[10]);
    }

    #[tokio::test]
    async fn test_quit_deletes_document() {
        let store = Arc::new(MemoryRoomStore::new());
        let coordinator = SyncCoordinator::new(Arc::clone(&store));
        let mut session = GameSession::new(RoomId::DEFAULT);

        session.dispatch(Intent::Place(10));
        coordinator.push(&mut session).await;
        assert!(store.get(RoomId::DEFAULT).is_some());

        coordinator.quit(&mut session).await;
        assert!(store.get(RoomId::DEFAULT).is_none());
        assert!(session.game().history().is_empty());
    }
}
