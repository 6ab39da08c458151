//! Entities of the watch-together session.
//!
//! `Session` is the aggregate root: every structural mutation of the roster,
//! the queue and the playback state goes through its methods, so the
//! invariants (single presenter, contiguous queue order, playback url equals
//! head-of-queue url) live in one place. Proposals that violate a rule return
//! a `SessionError` and leave the session untouched.

use serde::{Deserialize, Serialize};

use super::error::SessionError;
use super::value_object::{ClientId, EntryId, SessionId, Timestamp, VideoUrl, Volume};

/// Default participant capacity of a session
pub const DEFAULT_PARTICIPANT_CAPACITY: usize = 64;

/// Shared travel time of a chat message, in seconds.
///
/// Every recipient renders a chat traversal for exactly this duration so
/// messages appear to move at the same visual speed on every screen.
pub const TRAVEL_TIME_SECONDS: f64 = 10.0;

/// Role of a participant within the session.
///
/// Exactly one participant may hold `Presenter` at any time. `NoPresenter` is
/// a session-wide condition applied to every participant while nobody holds
/// the role; `Pending` is the transient state a claimant passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "presenter")]
    Presenter,
    #[serde(rename = "client")]
    Client,
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "no presenter")]
    NoPresenter,
}

impl Role {
    /// Transition table of the role state machine.
    ///
    /// The first four edges are personal transitions (claim and release).
    /// `Client <-> NoPresenter` is never taken voluntarily: those edges are
    /// applied session-wide by [`Session::refresh_roles`] when the presenter
    /// appears or vanishes.
    pub fn can_transition_to(self, next: Role) -> bool {
        matches!(
            (self, next),
            (Role::NoPresenter, Role::Pending)
                | (Role::Pending, Role::Presenter)
                | (Role::Pending, Role::NoPresenter)
                | (Role::Presenter, Role::Client)
                | (Role::NoPresenter, Role::Client)
                | (Role::Client, Role::NoPresenter)
        )
    }

    pub fn is_presenter(self) -> bool {
        matches!(self, Role::Presenter)
    }

    /// Wire representation of the role (matches the serde rename)
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Presenter => "presenter",
            Role::Client => "client",
            Role::Pending => "pending",
            Role::NoPresenter => "no presenter",
        }
    }
}

/// A connected participant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Participant {
    pub id: ClientId,
    pub role: Role,
    pub connected_at: Timestamp,
}

impl Participant {
    /// Create a new participant. The actual role is assigned by the session
    /// on registration, depending on whether a presenter is live.
    pub fn new(id: ClientId, connected_at: Timestamp) -> Self {
        Self {
            id,
            role: Role::NoPresenter,
            connected_at,
        }
    }
}

/// An entry of the shared video queue.
///
/// The entry's order is its position in [`Session::queue`]; it is not stored
/// on the entry so the zero-based contiguous order invariant holds by
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueEntry {
    pub id: EntryId,
    pub url: VideoUrl,
}

/// Authoritative playback snapshot emitted by the presenter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackState {
    pub url: VideoUrl,
    pub position_seconds: f64,
    pub paused: bool,
    pub volume: Volume,
}

/// An ephemeral chat message.
///
/// Never stored in the session: it exists only for the duration of its fan-out
/// and the animation on each client.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub text: String,
    pub emitted_at: Timestamp,
    pub travel_time_seconds: f64,
    /// Pseudo-random vertical lane in [0,1), chosen once at emission
    pub lane_y: f64,
}

impl ChatMessage {
    pub fn new(text: String, emitted_at: Timestamp, lane_y: f64) -> Self {
        Self {
            text,
            emitted_at,
            travel_time_seconds: TRAVEL_TIME_SECONDS,
            lane_y,
        }
    }
}

/// Effect of a queue mutation on the playback state
#[derive(Debug, Clone, PartialEq)]
pub enum HeadChange {
    /// The head entry is unchanged (or nothing was playing)
    Unchanged,
    /// The head entry changed while playing: playback restarts at the new head
    Reset(PlaybackState),
    /// The queue ran empty: playback is cleared
    Cleared,
}

/// The watch-together session aggregate
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: SessionId,
    pub created_at: Timestamp,
    pub participants: Vec<Participant>,
    pub queue: Vec<QueueEntry>,
    pub playback: Option<PlaybackState>,
    next_entry_id: u64,
    #[serde(skip)]
    participant_capacity: usize,
}

impl Session {
    pub fn new(id: SessionId, created_at: Timestamp) -> Self {
        Self::with_capacity(id, created_at, DEFAULT_PARTICIPANT_CAPACITY)
    }

    pub fn with_capacity(id: SessionId, created_at: Timestamp, participant_capacity: usize) -> Self {
        Self {
            id,
            created_at,
            participants: Vec::new(),
            queue: Vec::new(),
            playback: None,
            next_entry_id: 0,
            participant_capacity,
        }
    }

    // ----------------------------------------
    // Roster / Role Authority
    // ----------------------------------------

    pub fn participant(&self, client_id: &ClientId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == client_id)
    }

    fn participant_mut(&mut self, client_id: &ClientId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| &p.id == client_id)
    }

    /// The current presenter, if one is live
    pub fn presenter(&self) -> Option<&Participant> {
        self.participants.iter().find(|p| p.role.is_presenter())
    }

    /// Register a participant and return its assigned role.
    ///
    /// A joiner becomes `Client` while a presenter is live, `NoPresenter`
    /// otherwise.
    pub fn add_participant(&mut self, mut participant: Participant) -> Result<Role, SessionError> {
        if self.participants.len() >= self.participant_capacity {
            return Err(SessionError::SessionFull);
        }
        participant.role = if self.presenter().is_some() {
            Role::Client
        } else {
            Role::NoPresenter
        };
        let role = participant.role;
        self.participants.push(participant);
        Ok(role)
    }

    /// Remove a participant; returns `true` if it was the presenter.
    ///
    /// A presenter disconnect demotes all remaining participants to
    /// `NoPresenter`; playback stays frozen at the last authoritative
    /// snapshot until a new presenter claims.
    pub fn remove_participant(&mut self, client_id: &ClientId) -> bool {
        let was_presenter = self
            .participant(client_id)
            .is_some_and(|p| p.role.is_presenter());
        self.participants.retain(|p| &p.id != client_id);
        self.refresh_roles();
        was_presenter
    }

    /// Claim the presenter role.
    ///
    /// Fails with `RoleConflict` while another presenter is live; idempotent
    /// for the current presenter. The claimant passes through `Pending` so the
    /// transition table is exercised, not inferred.
    pub fn claim_presenter(&mut self, client_id: &ClientId) -> Result<(), SessionError> {
        let Some(current) = self.participant(client_id).map(|p| p.role) else {
            return Err(SessionError::UnknownParticipant(
                client_id.as_str().to_string(),
            ));
        };
        if current.is_presenter() {
            // no-op, safe to re-claim
            return Ok(());
        }
        if let Some(presenter) = self.presenter() {
            return Err(SessionError::RoleConflict(presenter.id.as_str().to_string()));
        }
        if !current.can_transition_to(Role::Pending) {
            return Err(SessionError::RoleConflict(client_id.as_str().to_string()));
        }
        let participant = self
            .participant_mut(client_id)
            .ok_or_else(|| SessionError::UnknownParticipant(client_id.as_str().to_string()))?;
        participant.role = Role::Pending;
        participant.role = Role::Presenter;
        self.refresh_roles();
        Ok(())
    }

    /// Release the presenter role. Only the current presenter may call.
    pub fn release_presenter(&mut self, client_id: &ClientId) -> Result<(), SessionError> {
        let participant = self
            .participant_mut(client_id)
            .ok_or_else(|| SessionError::UnknownParticipant(client_id.as_str().to_string()))?;
        if !participant.role.is_presenter() {
            return Err(SessionError::NotPresenter(client_id.as_str().to_string()));
        }
        participant.role = Role::Client;
        self.refresh_roles();
        Ok(())
    }

    /// Re-apply the session-wide role condition: with a live presenter every
    /// other participant is `Client`, without one everybody is `NoPresenter`.
    fn refresh_roles(&mut self) {
        let has_presenter = self.presenter().is_some();
        for p in &mut self.participants {
            if p.role.is_presenter() {
                continue;
            }
            p.role = if has_presenter {
                Role::Client
            } else {
                Role::NoPresenter
            };
        }
    }

    // ----------------------------------------
    // Queue Engine
    // ----------------------------------------

    /// The head-of-queue entry, i.e. the currently playing video
    pub fn head(&self) -> Option<&QueueEntry> {
        self.queue.first()
    }

    /// Zero-based order of an entry, resolved by id
    pub fn order_of(&self, entry_id: EntryId) -> Option<usize> {
        self.queue.iter().position(|e| e.id == entry_id)
    }

    /// Append a new entry with a fresh logical timestamp as its id
    pub fn enqueue(&mut self, url: VideoUrl) -> QueueEntry {
        let entry = QueueEntry {
            id: EntryId::new(self.next_entry_id),
            url,
        };
        // ids are never reused, even after removal
        self.next_entry_id += 1;
        self.queue.push(entry.clone());
        entry
    }

    /// Move an entry to `to_order`, shifting intervening entries by one.
    ///
    /// The entry is resolved by id, so a proposal computed against a stale
    /// local order still lands on the entry's current position. `to_order`
    /// beyond the end is clamped to the tail.
    pub fn move_entry(
        &mut self,
        entry_id: EntryId,
        to_order: usize,
    ) -> Result<HeadChange, SessionError> {
        let from = self
            .order_of(entry_id)
            .ok_or(SessionError::UnknownEntry(entry_id.value()))?;
        let entry = self.queue.remove(from);
        let to = to_order.min(self.queue.len());
        self.queue.insert(to, entry);
        Ok(self.sync_playback_with_head())
    }

    /// Remove an entry, closing the order gap behind it
    pub fn remove_entry(&mut self, entry_id: EntryId) -> Result<HeadChange, SessionError> {
        let at = self
            .order_of(entry_id)
            .ok_or(SessionError::UnknownEntry(entry_id.value()))?;
        self.queue.remove(at);
        Ok(self.sync_playback_with_head())
    }

    /// Reconcile the playback state after a queue mutation: if the head entry
    /// changed while something was playing, playback restarts at the new head
    /// (position 0, prior pause intent and volume preserved); if the queue ran
    /// empty, playback is cleared.
    fn sync_playback_with_head(&mut self) -> HeadChange {
        match (&self.playback, self.queue.first()) {
            (Some(playing), Some(head)) if playing.url == head.url => HeadChange::Unchanged,
            (Some(playing), Some(head)) => {
                let reset = PlaybackState {
                    url: head.url.clone(),
                    position_seconds: 0.0,
                    paused: playing.paused,
                    volume: playing.volume,
                };
                self.playback = Some(reset.clone());
                HeadChange::Reset(reset)
            }
            (Some(_), None) => {
                self.playback = None;
                HeadChange::Cleared
            }
            (None, _) => HeadChange::Unchanged,
        }
    }

    // ----------------------------------------
    // Playback Synchronizer
    // ----------------------------------------

    /// Apply a playback update from a participant.
    ///
    /// Only the live presenter's updates are authoritative; anything else is
    /// rejected. An update whose url is not the current head is stale (it
    /// raced against a queue change) and is rejected as well, which keeps the
    /// invariant `playback.url == head.url` at the single writer.
    pub fn apply_playback(
        &mut self,
        client_id: &ClientId,
        state: PlaybackState,
    ) -> Result<(), SessionError> {
        let Some(participant) = self.participant(client_id) else {
            return Err(SessionError::UnknownParticipant(
                client_id.as_str().to_string(),
            ));
        };
        if !participant.role.is_presenter() {
            return Err(SessionError::NotPresenter(client_id.as_str().to_string()));
        }
        match self.head() {
            Some(head) if head.url == state.url => {
                self.playback = Some(state);
                Ok(())
            }
            _ => Err(SessionError::StalePlaybackUpdate(
                state.url.as_str().to_string(),
            )),
        }
    }
}
