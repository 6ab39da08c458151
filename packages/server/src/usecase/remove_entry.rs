//! UseCase: queue removal.
//!
//! Removing the head entry while it is playing triggers the playback reset:
//! the next head restarts at position 0 with the prior pause intent and
//! volume, or playback is cleared when the queue ran empty. The removal
//! event and the resulting playback event are broadcast together under the
//! ordering gate.

use std::sync::Arc;

use crate::domain::{EntryId, HeadChange, MessagePusher, SessionError, SessionRepository};

use super::BroadcastGate;

pub struct RemoveEntryUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    gate: BroadcastGate,
}

impl RemoveEntryUseCase {
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

    /// Remove an entry and broadcast the canonical events built by
    /// `serialize` (the removal, plus the playback event when the head
    /// changed); returns the head change. `UnknownEntry` means the entry was
    /// already removed and the proposal is moot.
    pub async fn execute<F>(
        &self,
        entry_id: EntryId,
        serialize: F,
    ) -> Result<HeadChange, SessionError>
    where
        F: FnOnce(&HeadChange) -> Vec<String>,
    {
        let _ordering = self.gate.lock().await;

        let head_change = self.repository.remove_entry(entry_id).await?;
        let messages = serialize(&head_change);
        let targets = self.repository.get_all_connected_client_ids().await;
        for message in &messages {
            if let Err(e) = self
                .message_pusher
                .broadcast(targets.clone(), message)
                .await
            {
                tracing::warn!("Failed to broadcast queue-removed: {}", e);
            }
        }
        Ok(head_change)
    }
}
