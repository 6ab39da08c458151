//! Domain layer errors.

use thiserror::Error;

/// Validation errors for value objects
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueObjectError {
    #[error("client_id must be non-empty and at most {max} characters: '{value}'")]
    InvalidClientId { value: String, max: usize },

    #[error("video url must not be empty")]
    EmptyVideoUrl,

    #[error("volume must be within 0.0..=1.0: {0}")]
    VolumeOutOfRange(f64),
}

/// Rule violations raised by the session state machine.
///
/// None of these are surfaced to other participants: proposals that violate a
/// rule are logged and dropped, and the issuing client self-corrects on the
/// next canonical broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A claim was attempted while another presenter is live
    #[error("presenter role is already held by '{0}'")]
    RoleConflict(String),

    /// A presenter-only operation was issued by a non-presenter
    #[error("participant '{0}' is not the presenter")]
    NotPresenter(String),

    /// A playback update referenced a url that is not the current head
    #[error("stale playback update for url '{0}'")]
    StalePlaybackUpdate(String),

    /// A move/remove referenced an entry that is no longer in the queue
    #[error("unknown queue entry: {0}")]
    UnknownEntry(u64),

    /// An operation referenced a participant that is not connected
    #[error("unknown participant: '{0}'")]
    UnknownParticipant(String),

    /// The participant capacity of the session is exhausted
    #[error("session is full")]
    SessionFull,
}
