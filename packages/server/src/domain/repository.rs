//! Repository trait definition.
//!
//! The domain layer defines the data access interface it needs; the concrete
//! in-memory implementation lives in the infrastructure layer (dependency
//! inversion). Every method is one serialized proposal against the session:
//! implementations must guarantee single-writer semantics, which is what
//! keeps concurrent proposals from racing inside the engines.
//!
//! The in-memory session has no storage layer underneath, so methods surface
//! [`SessionError`] directly instead of a separate repository error type.

use async_trait::async_trait;

use super::entity::{HeadChange, Participant, PlaybackState, QueueEntry, Role, Session};
use super::error::SessionError;
use super::value_object::{ClientId, EntryId, Timestamp, VideoUrl};

/// Session repository trait
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Snapshot of the whole session (for the connect snapshot and debugging)
    async fn get_session(&self) -> Session;

    /// Register a participant; returns the role it was assigned
    async fn add_participant(
        &self,
        client_id: ClientId,
        connected_at: Timestamp,
    ) -> Result<Role, SessionError>;

    /// Remove a participant; returns `true` if it was the presenter
    async fn remove_participant(&self, client_id: &ClientId) -> bool;

    /// Claim the presenter role for a participant
    async fn claim_presenter(&self, client_id: &ClientId) -> Result<(), SessionError>;

    /// Release the presenter role held by a participant
    async fn release_presenter(&self, client_id: &ClientId) -> Result<(), SessionError>;

    /// All connected client ids
    async fn get_all_connected_client_ids(&self) -> Vec<ClientId>;

    /// Roster with current roles
    async fn get_participants(&self) -> Vec<Participant>;

    /// Number of connected participants
    async fn count_connected_clients(&self) -> usize;

    /// Append a queue entry; returns the entry and its order
    async fn enqueue(&self, url: VideoUrl) -> (QueueEntry, usize);

    /// Move an entry to a new order; returns the full canonical order and the
    /// playback effect of the head change, if any
    async fn move_entry(
        &self,
        entry_id: EntryId,
        to_order: usize,
    ) -> Result<(Vec<QueueEntry>, HeadChange), SessionError>;

    /// Remove an entry; returns the playback effect of the head change, if any
    async fn remove_entry(&self, entry_id: EntryId) -> Result<HeadChange, SessionError>;

    /// Apply a presenter playback update
    async fn apply_playback(
        &self,
        client_id: &ClientId,
        state: PlaybackState,
    ) -> Result<(), SessionError>;
}
