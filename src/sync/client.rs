//! Polling room client.
//!
//! One cooperative loop owns the session. It wakes for three things: a local
//! intent, a fetch result, or the poll timer. Fetches run as detached tasks
//! and a late result is still applied when it arrives. Writes go through a
//! single writer task, so one client's writes reach the store in the order
//! its intents were applied.

use super::coordinator::SyncCoordinator;
use super::store::RoomStore;
use crate::games::gomoku::Intent;
use crate::room::RoomId;
use crate::session::{GameSession, GameView, Outbound};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

/// Poll interval used when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Event loop keeping one session in step with its room document.
pub struct RoomClient<S: ?Sized> {
    session: GameSession,
    coordinator: SyncCoordinator<S>,
    poll_interval: Duration,
    views: watch::Sender<GameView>,
}

/// Handle to a running [`RoomClient`].
pub struct ClientHandle {
    intents: mpsc::UnboundedSender<Intent>,
    views: watch::Receiver<GameView>,
    task: JoinHandle<GameSession>,
}

impl<S: RoomStore + ?Sized + 'static> RoomClient<S> {
    /// Creates a client for `room` and the receiver its views go to.
    #[instrument(skip(store))]
    pub fn new(
        room: RoomId,
        store: Arc<S>,
        poll_interval: Duration,
    ) -> (Self, watch::Receiver<GameView>) {
        let session = GameSession::new(room);
        let (views, rx) = watch::channel(session.view());
        let client = Self {
            session,
            coordinator: SyncCoordinator::new(store),
            poll_interval,
            views,
        };
        (client, rx)
    }

    /// Starts a client on the current runtime.
    pub fn spawn(room: RoomId, store: Arc<S>, poll_interval: Duration) -> ClientHandle {
        let (client, views) = Self::new(room, store, poll_interval);
        let (intents, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(client.run(rx));
        ClientHandle {
            intents,
            views,
            task,
        }
    }

    /// Runs until `intents` closes, then returns the final session.
    ///
    /// Queued intents are applied before anything else. Closing the channel
    /// stops the poll timer, and the loop returns only after every write it
    /// queued has been sent. Fetches already in flight are not cancelled.
    #[instrument(
        skip_all,
        fields(room = %self.session.room(), interval_ms = self.poll_interval.as_millis() as u64)
    )]
    pub async fn run(mut self, mut intents: mpsc::UnboundedReceiver<Intent>) -> GameSession {
        info!("Starting room sync loop");

        let (writes, writer) = self.start_writer();
        let (pulled_tx, mut pulled_rx) = mpsc::unbounded_channel();
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                intent = intents.recv() => {
                    let Some(intent) = intent else {
                        break;
                    };
                    debug!(%intent, "Local intent");
                    if self.session.dispatch(intent) {
                        self.publish();
                    }
                    self.flush(&writes);
                }
                Some(value) = pulled_rx.recv() => {
                    self.session.apply_pull(value);
                    self.publish();
                }
                _ = ticker.tick() => {
                    let coordinator = self.coordinator.clone();
                    let room = self.session.room();
                    let tx = pulled_tx.clone();
                    tokio::spawn(async move {
                        if let Some(value) = coordinator.fetch(room).await {
                            // Receiver is gone once the loop has ended.
                            let _ = tx.send(value);
                        }
                    });
                }
            }
        }

        drop(writes);
        if let Err(e) = writer.await {
            warn!(error = %e, "Room writer did not finish cleanly");
        }
        info!("Room sync loop stopped");
        self.session
    }

    /// Spawns the task that sends this client's writes one at a time.
    fn start_writer(&self) -> (mpsc::UnboundedSender<Outbound>, JoinHandle<()>) {
        let coordinator = self.coordinator.clone();
        let room = self.session.room();
        let (writes, mut queue) = mpsc::unbounded_channel::<Outbound>();
        let writer = tokio::spawn(async move {
            while let Some(outbound) = queue.recv().await {
                coordinator.send(room, outbound).await;
            }
        });
        (writes, writer)
    }

    fn flush(&mut self, writes: &mpsc::UnboundedSender<Outbound>) {
        if let Some(outbound) = self.session.take_outbound() {
            if writes.send(outbound).is_err() {
                warn!(room = %self.session.room(), "Room writer stopped, dropping write");
            }
        }
    }

    fn publish(&self) {
        self.views.send_if_modified(|current| {
            let next = self.session.view();
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

impl ClientHandle {
    /// Queues a local intent. Returns `false` once the client has stopped.
    pub fn send(&self, intent: Intent) -> bool {
        self.intents.send(intent).is_ok()
    }

    /// Returns a receiver of view updates.
    pub fn views(&self) -> watch::Receiver<GameView> {
        self.views.clone()
    }

    /// Returns the latest view.
    pub fn view(&self) -> GameView {
        self.views.borrow().clone()
    }

    /// Leaves the room: resets the game, deletes the room document, and
    /// stops the loop once the delete has been sent.
    pub async fn quit(self) -> Option<GameSession> {
        if !self.send(Intent::Reset) {
            debug!("Room sync loop already stopped before quit");
        }
        self.shutdown().await
    }

    /// Stops the loop and returns the final session.
    ///
    /// Writes queued before the call are sent first.
    pub async fn shutdown(self) -> Option<GameSession> {
        drop(self.intents);
        match self.task.await {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(error = %e, "Room sync loop did not finish cleanly");
                None
            }
        }
    }
}
