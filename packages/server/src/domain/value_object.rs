//! Value objects of the session domain.

use serde::{Deserialize, Serialize};

use super::error::ValueObjectError;

const CLIENT_ID_MAX_LEN: usize = 64;

/// Opaque per-connection identifier of a participant
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(String);

impl ClientId {
    /// Create a new ClientId, validating the raw string
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() || value.len() > CLIENT_ID_MAX_LEN {
            return Err(ValueObjectError::InvalidClientId {
                value,
                max: CLIENT_ID_MAX_LEN,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ClientId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque video locator. The core never interprets it beyond equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoUrl(String);

impl VideoUrl {
    /// Create a new VideoUrl; the only validation is non-emptiness
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyVideoUrl);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Playback volume, clamped to 0.0..=1.0 at construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Volume(f64);

impl Volume {
    pub fn new(value: f64) -> Result<Self, ValueObjectError> {
        if !(0.0..=1.0).contains(&value) || value.is_nan() {
            return Err(ValueObjectError::VolumeOutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Logical timestamp identifying a queue entry.
///
/// Allocated from a per-session monotonic counter at `Add` time; unique per
/// entry and never reused, even after removal. This is the only identity used
/// across network messages (never a raw index, which shifts under concurrent
/// edits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Unix timestamp in milliseconds (JST)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Identifier of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Factory for session ids
pub struct SessionIdFactory;

impl SessionIdFactory {
    /// Generate a fresh random session id
    pub fn generate() -> SessionId {
        SessionId(uuid::Uuid::new_v4().to_string())
    }
}
