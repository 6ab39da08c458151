//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::usecase::{
    AddEntryUseCase, BroadcastChatUseCase, ClaimPresenterUseCase, ConnectParticipantUseCase,
    DisconnectParticipantUseCase, MoveEntryUseCase, ReleasePresenterUseCase, RemoveEntryUseCase,
    UpdatePlaybackUseCase,
};

use super::{
    handler::{debug_session_state, get_session_detail, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Watch-together synchronization server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(app_state);
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    claim_presenter_usecase: Arc<ClaimPresenterUseCase>,
    release_presenter_usecase: Arc<ReleasePresenterUseCase>,
    add_entry_usecase: Arc<AddEntryUseCase>,
    move_entry_usecase: Arc<MoveEntryUseCase>,
    remove_entry_usecase: Arc<RemoveEntryUseCase>,
    update_playback_usecase: Arc<UpdatePlaybackUseCase>,
    broadcast_chat_usecase: Arc<BroadcastChatUseCase>,
}

impl Server {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        connect_participant_usecase: Arc<ConnectParticipantUseCase>,
        disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
        claim_presenter_usecase: Arc<ClaimPresenterUseCase>,
        release_presenter_usecase: Arc<ReleasePresenterUseCase>,
        add_entry_usecase: Arc<AddEntryUseCase>,
        move_entry_usecase: Arc<MoveEntryUseCase>,
        remove_entry_usecase: Arc<RemoveEntryUseCase>,
        update_playback_usecase: Arc<UpdatePlaybackUseCase>,
        broadcast_chat_usecase: Arc<BroadcastChatUseCase>,
    ) -> Self {
        Self {
            connect_participant_usecase,
            disconnect_participant_usecase,
            claim_presenter_usecase,
            release_presenter_usecase,
            add_entry_usecase,
            move_entry_usecase,
            remove_entry_usecase,
            update_playback_usecase,
            broadcast_chat_usecase,
        }
    }

    /// Run the watch-together server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            connect_participant_usecase: self.connect_participant_usecase,
            disconnect_participant_usecase: self.disconnect_participant_usecase,
            claim_presenter_usecase: self.claim_presenter_usecase,
            release_presenter_usecase: self.release_presenter_usecase,
            add_entry_usecase: self.add_entry_usecase,
            move_entry_usecase: self.move_entry_usecase,
            remove_entry_usecase: self.remove_entry_usecase,
            update_playback_usecase: self.update_playback_usecase,
            broadcast_chat_usecase: self.broadcast_chat_usecase,
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/debug/session", get(debug_session_state))
            .route("/api/health", get(health_check))
            .route("/api/session", get(get_session_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "Watch-together server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
