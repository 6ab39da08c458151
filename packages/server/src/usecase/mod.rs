//! UseCase layer: one struct per participant-facing operation.
//!
//! Each usecase validates and applies a proposal through the repository (the
//! single-writer path) and hands canonical events to the message pusher.
//! Event serialization stays in the UI layer: it is either passed in
//! pre-serialized or built by a closure the UI supplies.
//!
//! The queue and playback usecases share a [`BroadcastGate`]: a mutation and
//! its fan-out happen under one acquisition, so canonical events leave in
//! the order the session applied the proposals. Without it, two concurrent
//! proposals could broadcast in the opposite order and a delta event like
//! `queue added` would leave clients diverged until the next full-order
//! event.

use std::sync::Arc;

/// Ordering lock spanning a state mutation and its canonical broadcast
pub type BroadcastGate = Arc<tokio::sync::Mutex<()>>;

pub mod add_entry;
pub mod broadcast_chat;
pub mod claim_presenter;
pub mod connect_participant;
pub mod disconnect_participant;
pub mod error;
pub mod move_entry;
pub mod release_presenter;
pub mod remove_entry;
pub mod update_playback;

pub use add_entry::AddEntryUseCase;
pub use broadcast_chat::BroadcastChatUseCase;
pub use claim_presenter::ClaimPresenterUseCase;
pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::{DisconnectOutcome, DisconnectParticipantUseCase};
pub use error::ConnectError;
pub use move_entry::MoveEntryUseCase;
pub use release_presenter::ReleasePresenterUseCase;
pub use remove_entry::RemoveEntryUseCase;
pub use update_playback::UpdatePlaybackUseCase;
