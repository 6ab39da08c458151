//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    domain::Session,
    infrastructure::dto::{
        conversion::queue_order_dtos,
        http::{ParticipantDetailDto, SessionDetailDto},
    },
    ui::state::AppState,
};
use kotatsu_shared::time::timestamp_to_rfc3339;

/// Debug endpoint to get current session state (for testing purposes)
pub async fn debug_session_state(State(state): State<Arc<AppState>>) -> Json<Session> {
    let session = state.connect_participant_usecase.snapshot().await;
    Json(session)
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get session detail
pub async fn get_session_detail(State(state): State<Arc<AppState>>) -> Json<SessionDetailDto> {
    let session = state.connect_participant_usecase.snapshot().await;

    // Domain Model から DTO への変換
    let detail = SessionDetailDto {
        id: session.id.as_str().to_string(),
        participants: session
            .participants
            .iter()
            .map(|p| ParticipantDetailDto {
                client_id: p.id.as_str().to_string(),
                role: p.role.as_str().to_string(),
                connected_at: timestamp_to_rfc3339(p.connected_at.value()),
            })
            .collect(),
        queue: queue_order_dtos(&session.queue),
        playback: session.playback.as_ref().map(Into::into),
        created_at: timestamp_to_rfc3339(session.created_at.value()),
    };
    Json(detail)
}
