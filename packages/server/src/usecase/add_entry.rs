//! UseCase: queue append.

use std::sync::Arc;

use crate::domain::{MessagePusher, QueueEntry, SessionRepository, VideoUrl};

use super::BroadcastGate;

pub struct AddEntryUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    gate: BroadcastGate,
}

impl AddEntryUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        gate: BroadcastGate,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            gate,
        }
    }

    /// Append a url to the queue and broadcast the canonical event built by
    /// `serialize`; returns the canonical entry and its order.
    ///
    /// Any participant may add. The entry id is a fresh logical timestamp
    /// assigned by the session and never reused. The gate holds the broadcast
    /// to the application order: `queue added` is a delta, so out-of-order
    /// arrival would leave clients with a diverged queue.
    pub async fn execute<F>(&self, url: VideoUrl, serialize: F) -> (QueueEntry, usize)
    where
        F: FnOnce(&QueueEntry, usize) -> String,
    {
        let _ordering = self.gate.lock().await;

        let (entry, order) = self.repository.enqueue(url).await;
        let message = serialize(&entry, order);
        let targets = self.repository.get_all_connected_client_ids().await;
        if let Err(e) = self.message_pusher.broadcast(targets, &message).await {
            tracing::warn!("Failed to broadcast queue-added: {}", e);
        }
        (entry, order)
    }
}
