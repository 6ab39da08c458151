//! Server state shared across handlers.

use std::sync::Arc;

use crate::usecase::{
    AddEntryUseCase, BroadcastChatUseCase, ClaimPresenterUseCase, ConnectParticipantUseCase,
    DisconnectParticipantUseCase, MoveEntryUseCase, ReleasePresenterUseCase, RemoveEntryUseCase,
    UpdatePlaybackUseCase,
};

/// Shared application state: one usecase per participant-facing operation
pub struct AppState {
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    pub claim_presenter_usecase: Arc<ClaimPresenterUseCase>,
    pub release_presenter_usecase: Arc<ReleasePresenterUseCase>,
    pub add_entry_usecase: Arc<AddEntryUseCase>,
    pub move_entry_usecase: Arc<MoveEntryUseCase>,
    pub remove_entry_usecase: Arc<RemoveEntryUseCase>,
    pub update_playback_usecase: Arc<UpdatePlaybackUseCase>,
    pub broadcast_chat_usecase: Arc<BroadcastChatUseCase>,
}
