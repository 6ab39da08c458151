//! UseCase: queue reorder.
//!
//! Proposals name entries by id, never by raw index, so a move computed
//! against a stale local order still resolves against the entry's current
//! position. The canonical response is the complete new ordering, which
//! sidesteps incremental-patch ambiguity under concurrent moves.

use std::sync::Arc;

use crate::domain::{
    EntryId, HeadChange, MessagePusher, QueueEntry, SessionError, SessionRepository,
};

use super::BroadcastGate;

pub struct MoveEntryUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    gate: BroadcastGate,
}

impl MoveEntryUseCase {
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

    /// Move an entry and broadcast the canonical events built by `serialize`
    /// (the full new order, plus the playback event when the head changed);
    /// returns the full canonical order and the head change. `UnknownEntry`
    /// means the entry was removed concurrently and the proposal is moot.
    pub async fn execute<F>(
        &self,
        entry_id: EntryId,
        to_order: usize,
        serialize: F,
    ) -> Result<(Vec<QueueEntry>, HeadChange), SessionError>
    where
        F: FnOnce(&[QueueEntry], &HeadChange) -> Vec<String>,
    {
        let _ordering = self.gate.lock().await;

        let (order, head_change) = self.repository.move_entry(entry_id, to_order).await?;
        let messages = serialize(&order, &head_change);
        let targets = self.repository.get_all_connected_client_ids().await;
        for message in &messages {
            if let Err(e) = self
                .message_pusher
                .broadcast(targets.clone(), message)
                .await
            {
                tracing::warn!("Failed to broadcast queue-reordered: {}", e);
            }
        }
        Ok((order, head_change))
    }
}
