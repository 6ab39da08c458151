//! HTTP API response DTOs.

use serde::Serialize;

use super::websocket::{PlaybackDto, QueueEntryDto};

/// Detail view of the session for `GET /api/session`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetailDto {
    pub id: String,
    pub participants: Vec<ParticipantDetailDto>,
    pub queue: Vec<QueueEntryDto>,
    pub playback: Option<PlaybackDto>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDetailDto {
    pub client_id: String,
    pub role: String,
    pub connected_at: String,
}
