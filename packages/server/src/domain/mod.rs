//! Domain layer for the watch-together session.
//!
//! This module contains the session state machine and its invariants,
//! independent of data transfer objects and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{
    ChatMessage, HeadChange, Participant, PlaybackState, QueueEntry, Role, Session,
    DEFAULT_PARTICIPANT_CAPACITY, TRAVEL_TIME_SECONDS,
};
pub use error::{SessionError, ValueObjectError};
pub use message_pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use repository::SessionRepository;
pub use value_object::{ClientId, EntryId, SessionId, SessionIdFactory, Timestamp, VideoUrl, Volume};
