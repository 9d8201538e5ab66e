// SPDX-License-Identifier: GPL-3.0-only

//! Session driver task
//!
//! Owns a [`CaptureSession`] on a tokio task and feeds it intents one at a
//! time, so a long-running export never overlaps another transition.

use crate::app::CaptureSession;
use crate::app::state::{Intent, Snapshot};
use crate::constants::INTENT_QUEUE_CAPACITY;
use crate::errors::{SessionError, SessionResult};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

type Reply = oneshot::Sender<SessionResult<()>>;

/// Handle to a session running on its own task
pub struct SessionDriver {
    intents: mpsc::Sender<(Intent, Option<Reply>)>,
    snapshots: watch::Receiver<Snapshot>,
    task: JoinHandle<()>,
}

impl SessionDriver {
    /// Move the session onto a new task
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(mut session: CaptureSession) -> Self {
        let (intents, mut rx) = mpsc::channel::<(Intent, Option<Reply>)>(INTENT_QUEUE_CAPACITY);
        let snapshots = session.subscribe();

        let task = tokio::spawn(async move {
            while let Some((intent, reply)) = rx.recv().await {
                let result = session.update(intent).await;
                if let Some(reply) = reply {
                    let _ = reply.send(result);
                }
            }

            debug!("Intent channel closed");
            session.teardown();
        });

        Self {
            intents,
            snapshots,
            task,
        }
    }

    /// Queue an intent without waiting for it to be handled
    pub async fn send(&self, intent: Intent) -> SessionResult<()> {
        self.intents
            .send((intent, None))
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Queue an intent and wait for its result
    pub async fn dispatch(&self, intent: Intent) -> SessionResult<()> {
        let (reply, result) = oneshot::channel();
        self.intents
            .send((intent, Some(reply)))
            .await
            .map_err(|_| SessionError::Closed)?;
        result.await.map_err(|_| SessionError::Closed)?
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Stop accepting intents, finish queued ones, and tear the session down
    pub async fn shutdown(self) {
        info!("Shutting down session driver");
        drop(self.intents);
        let _ = self.task.await;
    }
}
