//! Conversion logic between DTOs and domain entities.

use crate::domain::{ChatMessage, Participant, PlaybackState, QueueEntry, Session};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Participant> for dto::ParticipantDto {
    fn from(model: &Participant) -> Self {
        Self {
            client_id: model.id.as_str().to_string(),
            role: model.role.as_str().to_string(),
            connected_at: model.connected_at.value(),
        }
    }
}

impl From<&PlaybackState> for dto::PlaybackDto {
    fn from(model: &PlaybackState) -> Self {
        Self {
            url: model.url.as_str().to_string(),
            position_seconds: model.position_seconds,
            paused: model.paused,
            volume: model.volume.value(),
        }
    }
}

impl From<&ChatMessage> for dto::ServerEvent {
    fn from(model: &ChatMessage) -> Self {
        dto::ServerEvent::ChatMessage {
            text: model.text.clone(),
            emitted_at: model.emitted_at.value(),
            travel_time_seconds: model.travel_time_seconds,
            lane_y: model.lane_y,
        }
    }
}

/// Build the wire view of an entry at a known order
pub fn queue_entry_dto(entry: &QueueEntry, order: usize) -> dto::QueueEntryDto {
    dto::QueueEntryDto {
        entry_id: entry.id.value(),
        url: entry.url.as_str().to_string(),
        order,
    }
}

/// Build the wire view of a full canonical order
pub fn queue_order_dtos(queue: &[QueueEntry]) -> Vec<dto::QueueEntryDto> {
    queue
        .iter()
        .enumerate()
        .map(|(order, entry)| queue_entry_dto(entry, order))
        .collect()
}

/// Build the full state snapshot pushed to a newly connected participant
pub fn session_connected_event(session: &Session) -> dto::ServerEvent {
    dto::ServerEvent::SessionConnected {
        session_id: session.id.as_str().to_string(),
        participants: session.participants.iter().map(Into::into).collect(),
        queue: queue_order_dtos(&session.queue),
        playback: session.playback.as_ref().map(Into::into),
    }
}

/// Build the canonical playback broadcast for the current state
pub fn playback_state_event(playback: &PlaybackState) -> dto::ServerEvent {
    dto::ServerEvent::PlaybackState {
        url: playback.url.as_str().to_string(),
        position_seconds: playback.position_seconds,
        paused: playback.paused,
        volume: playback.volume.value(),
    }
}
