//! In-memory SessionRepository implementation.
//!
//! Holds the `Session` domain model behind a `tokio::sync::Mutex` and
//! forwards every call to the aggregate's methods. The mutex is load-bearing:
//! it serializes all proposals against the session, which is the
//! single-writer discipline the engines rely on. No other code path may hold
//! a reference to the session.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ClientId, EntryId, HeadChange, Participant, PlaybackState, QueueEntry, Role, Session,
    SessionError, SessionRepository, Timestamp, VideoUrl,
};

/// In-memory session repository
pub struct InMemorySessionRepository {
    session: Arc<Mutex<Session>>,
}

impl InMemorySessionRepository {
    pub fn new(session: Arc<Mutex<Session>>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn get_session(&self) -> Session {
        let session = self.session.lock().await;
        session.clone()
    }

    async fn add_participant(
        &self,
        client_id: ClientId,
        connected_at: Timestamp,
    ) -> Result<Role, SessionError> {
        let mut session = self.session.lock().await;
        session.add_participant(Participant::new(client_id, connected_at))
    }

    async fn remove_participant(&self, client_id: &ClientId) -> bool {
        let mut session = self.session.lock().await;
        session.remove_participant(client_id)
    }

    async fn claim_presenter(&self, client_id: &ClientId) -> Result<(), SessionError> {
        let mut session = self.session.lock().await;
        session.claim_presenter(client_id)
    }

    async fn release_presenter(&self, client_id: &ClientId) -> Result<(), SessionError> {
        let mut session = self.session.lock().await;
        session.release_presenter(client_id)
    }

    async fn get_all_connected_client_ids(&self) -> Vec<ClientId> {
        let session = self.session.lock().await;
        session.participants.iter().map(|p| p.id.clone()).collect()
    }

    async fn get_participants(&self) -> Vec<Participant> {
        let session = self.session.lock().await;
        session.participants.clone()
    }

    async fn count_connected_clients(&self) -> usize {
        let session = self.session.lock().await;
        session.participants.len()
    }

    async fn enqueue(&self, url: VideoUrl) -> (QueueEntry, usize) {
        let mut session = self.session.lock().await;
        let entry = session.enqueue(url);
        let order = session.queue.len() - 1;
        (entry, order)
    }

    async fn move_entry(
        &self,
        entry_id: EntryId,
        to_order: usize,
    ) -> Result<(Vec<QueueEntry>, HeadChange), SessionError> {
        let mut session = self.session.lock().await;
        let change = session.move_entry(entry_id, to_order)?;
        Ok((session.queue.clone(), change))
    }

    async fn remove_entry(&self, entry_id: EntryId) -> Result<HeadChange, SessionError> {
        let mut session = self.session.lock().await;
        session.remove_entry(entry_id)
    }

    async fn apply_playback(
        &self,
        client_id: &ClientId,
        state: PlaybackState,
    ) -> Result<(), SessionError> {
        let mut session = self.session.lock().await;
        session.apply_playback(client_id, state)
    }
}
