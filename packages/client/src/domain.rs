//! Client-side session mirror.
//!
//! [`SessionView`] holds the last canonical state received from the server
//! plus two purely local artifacts: an optimistic queue overlay for this
//! client's own pending proposals, and a wall-clock extrapolation of the
//! playback position. Both are presentation-only; every canonical event
//! replaces them unconditionally, so a rejected or reordered proposal simply
//! vanishes at the next broadcast.

use std::time::Instant;

use thiserror::Error;

use kotatsu_server::infrastructure::dto::websocket::{
    ClientIntent, ParticipantDto, QueueEntryDto, ServerEvent,
};

use crate::command::Command;

const DEFAULT_VOLUME: f64 = 1.0;

/// Locally extrapolated playback state.
///
/// `base_position_seconds` is the position of the last authoritative
/// snapshot; the rendered position advances from it at wall-clock rate while
/// playing. There is no interpolation: a new snapshot snaps the base, even
/// backwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackView {
    pub url: String,
    pub base_position_seconds: f64,
    pub paused: bool,
    pub volume: f64,
    pub synced_at: Instant,
}

impl PlaybackView {
    /// Position to render at `now`
    pub fn rendered_position(&self, now: Instant) -> f64 {
        if self.paused {
            self.base_position_seconds
        } else {
            self.base_position_seconds + now.duration_since(self.synced_at).as_secs_f64()
        }
    }
}

/// What to do with a parsed command
#[derive(Debug, Clone, PartialEq)]
pub enum Proposal {
    /// Send this intent to the server
    Send(ClientIntent),
    /// Handled locally, nothing goes on the wire
    ShowQueue,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandRejection {
    #[error("You are not the presenter; claim with /present first")]
    NotPresenter,

    #[error("The queue is empty; add a video with /add first")]
    NothingToPlay,
}

/// The client's mirror of the session
#[derive(Debug, Clone)]
pub struct SessionView {
    pub client_id: String,
    pub role: String,
    pub participants: Vec<ParticipantDto>,
    pub queue: Vec<QueueEntryDto>,
    /// Optimistic overlay shown until the next canonical queue event
    pub predicted_queue: Option<Vec<QueueEntryDto>>,
    pub playback: Option<PlaybackView>,
}

impl SessionView {
    pub fn new(client_id: String) -> Self {
        Self {
            client_id,
            role: "no presenter".to_string(),
            participants: Vec::new(),
            queue: Vec::new(),
            predicted_queue: None,
            playback: None,
        }
    }

    pub fn is_presenter(&self) -> bool {
        self.role == "presenter"
    }

    /// The queue to display: the optimistic overlay if one is pending,
    /// the canonical order otherwise
    pub fn visible_queue(&self) -> &[QueueEntryDto] {
        self.predicted_queue.as_deref().unwrap_or(&self.queue)
    }

    /// Apply a canonical server event.
    ///
    /// Canonical events always win: any queue event discards the optimistic
    /// overlay, and a playback snapshot snaps the rendered position (even
    /// backwards). The one exception is a playback snapshot whose url does
    /// not match the local head of the queue: that snapshot lost a race
    /// against a queue change and is ignored.
    pub fn apply_event(&mut self, event: &ServerEvent, now: Instant) {
        match event {
            ServerEvent::SessionConnected {
                participants,
                queue,
                playback,
                ..
            } => {
                self.participants = participants.clone();
                self.queue = queue.clone();
                self.predicted_queue = None;
                self.playback = playback.as_ref().map(|p| PlaybackView {
                    url: p.url.clone(),
                    base_position_seconds: p.position_seconds,
                    paused: p.paused,
                    volume: p.volume,
                    synced_at: now,
                });
            }
            ServerEvent::RoleAssigned { role } => {
                self.role = role.clone();
            }
            ServerEvent::ParticipantJoined {
                client_id,
                connected_at,
            } => {
                // a joiner's role follows the session-wide condition
                let has_presenter = self.participants.iter().any(|p| p.role == "presenter");
                self.participants.push(ParticipantDto {
                    client_id: client_id.clone(),
                    role: if has_presenter { "client" } else { "no presenter" }.to_string(),
                    connected_at: *connected_at,
                });
            }
            ServerEvent::ParticipantLeft { client_id, .. } => {
                self.participants.retain(|p| &p.client_id != client_id);
            }
            ServerEvent::QueueAdded { entry } => {
                self.queue.push(entry.clone());
                self.predicted_queue = None;
            }
            ServerEvent::QueueReordered { order } => {
                self.queue = order.clone();
                self.predicted_queue = None;
            }
            ServerEvent::QueueRemoved { entry_id } => {
                self.queue.retain(|e| e.entry_id != *entry_id);
                self.predicted_queue = None;
            }
            ServerEvent::PlaybackState {
                url,
                position_seconds,
                paused,
                volume,
            } => {
                // a snapshot racing a queue change can arrive after the event
                // that obsoleted it; anything but the canonical head is stale
                if !self.queue.first().is_some_and(|head| &head.url == url) {
                    return;
                }
                self.playback = Some(PlaybackView {
                    url: url.clone(),
                    base_position_seconds: *position_seconds,
                    paused: *paused,
                    volume: *volume,
                    synced_at: now,
                });
            }
            ServerEvent::PlaybackCleared {} => {
                self.playback = None;
            }
            // chat is ephemeral: rendered, never part of the view
            ServerEvent::ChatMessage { .. } => {}
        }
    }

    /// Turn a parsed command into a wire proposal, applying the optimistic
    /// local prediction for queue edits.
    pub fn propose(
        &mut self,
        command: Command,
        now: Instant,
    ) -> Result<Proposal, CommandRejection> {
        match command {
            Command::Present => Ok(Proposal::Send(ClientIntent::ClaimPresenter {})),
            Command::Release => Ok(Proposal::Send(ClientIntent::ReleasePresenter {})),
            Command::Add(url) => Ok(Proposal::Send(ClientIntent::MessageAdded { message: url })),
            Command::Move { entry_id, to_order } => {
                self.predict_move(entry_id, to_order);
                Ok(Proposal::Send(ClientIntent::Reorder { entry_id, to_order }))
            }
            Command::Remove(entry_id) => {
                self.predict_remove(entry_id);
                Ok(Proposal::Send(ClientIntent::Remove { entry_id }))
            }
            Command::Play => self.playback_proposal(now, |p| p.paused = false),
            Command::Pause => self.playback_proposal(now, |p| p.paused = true),
            Command::Seek(seconds) => self.playback_proposal(now, |p| {
                p.base_position_seconds = seconds;
                p.synced_at = now;
            }),
            Command::Volume(volume) => self.playback_proposal(now, |p| p.volume = volume),
            Command::Chat(text) => Ok(Proposal::Send(ClientIntent::Chat { text })),
            Command::ShowQueue => Ok(Proposal::ShowQueue),
        }
    }

    /// Build a `playback update` intent from the current rendered state with
    /// `edit` applied. Starts playback at the head of the queue when nothing
    /// is playing yet.
    fn playback_proposal<F>(
        &mut self,
        now: Instant,
        edit: F,
    ) -> Result<Proposal, CommandRejection>
    where
        F: FnOnce(&mut PlaybackView),
    {
        if !self.is_presenter() {
            return Err(CommandRejection::NotPresenter);
        }
        let mut playback = match &self.playback {
            Some(p) => PlaybackView {
                base_position_seconds: p.rendered_position(now),
                synced_at: now,
                ..p.clone()
            },
            None => {
                let head = self
                    .visible_queue()
                    .first()
                    .ok_or(CommandRejection::NothingToPlay)?;
                PlaybackView {
                    url: head.url.clone(),
                    base_position_seconds: 0.0,
                    paused: true,
                    volume: DEFAULT_VOLUME,
                    synced_at: now,
                }
            }
        };
        edit(&mut playback);
        Ok(Proposal::Send(ClientIntent::PlaybackUpdate {
            url: playback.url,
            position_seconds: playback.base_position_seconds,
            paused: playback.paused,
            volume: playback.volume,
        }))
    }

    /// Presenter sync loop: the intent to re-announce the current rendered
    /// position, if this client is the playing presenter
    pub fn sync_intent(&self, now: Instant) -> Option<ClientIntent> {
        if !self.is_presenter() {
            return None;
        }
        let playback = self.playback.as_ref()?;
        if playback.paused {
            return None;
        }
        Some(ClientIntent::PlaybackUpdate {
            url: playback.url.clone(),
            position_seconds: playback.rendered_position(now),
            paused: false,
            volume: playback.volume,
        })
    }

    fn predict_move(&mut self, entry_id: u64, to_order: usize) {
        let mut predicted = self.visible_queue().to_vec();
        if let Some(from) = predicted.iter().position(|e| e.entry_id == entry_id) {
            let entry = predicted.remove(from);
            let to = to_order.min(predicted.len());
            predicted.insert(to, entry);
            for (order, entry) in predicted.iter_mut().enumerate() {
                entry.order = order;
            }
            self.predicted_queue = Some(predicted);
        }
    }

    fn predict_remove(&mut self, entry_id: u64) {
        let mut predicted = self.visible_queue().to_vec();
        predicted.retain(|e| e.entry_id != entry_id);
        for (order, entry) in predicted.iter_mut().enumerate() {
            entry.order = order;
        }
        self.predicted_queue = Some(predicted);
    }
}
