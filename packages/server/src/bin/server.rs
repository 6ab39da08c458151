//! Watch-together synchronization server.
//!
//! Hosts a single session: one authoritative presenter, a shared ordered
//! video queue and an ephemeral chat, synchronized over WebSocket.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kotatsu-server
//! cargo run --bin kotatsu-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;
use tokio::sync::Mutex;

use kotatsu_server::{
    domain::{Session, SessionIdFactory, Timestamp},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository,
    },
    ui::Server,
    usecase::{
        AddEntryUseCase, BroadcastChatUseCase, BroadcastGate, ClaimPresenterUseCase,
        ConnectParticipantUseCase, DisconnectParticipantUseCase, MoveEntryUseCase,
        ReleasePresenterUseCase, RemoveEntryUseCase, UpdatePlaybackUseCase,
    },
};
use kotatsu_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock, now_timestamp},
};

#[derive(Parser, Debug)]
#[command(name = "kotatsu-server")]
#[command(about = "Watch-together synchronization server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Create Repository (in-memory session)
    let session = Arc::new(Mutex::new(Session::new(
        SessionIdFactory::generate(),
        Timestamp::new(now_timestamp()),
    )));
    tracing::info!("Session {} created!", session.lock().await.id.as_str());
    let repository = Arc::new(InMemorySessionRepository::new(session));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create UseCases
    // (queue and playback usecases share one gate so canonical broadcasts
    //  leave in application order)
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let broadcast_gate: BroadcastGate = Arc::new(Mutex::new(()));
    let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let claim_presenter_usecase = Arc::new(ClaimPresenterUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let release_presenter_usecase = Arc::new(ReleasePresenterUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let add_entry_usecase = Arc::new(AddEntryUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        broadcast_gate.clone(),
    ));
    let move_entry_usecase = Arc::new(MoveEntryUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        broadcast_gate.clone(),
    ));
    let remove_entry_usecase = Arc::new(RemoveEntryUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        broadcast_gate.clone(),
    ));
    let update_playback_usecase = Arc::new(UpdatePlaybackUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        broadcast_gate,
    ));
    let broadcast_chat_usecase = Arc::new(BroadcastChatUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock,
    ));

    // 4. Create and run the server
    let server = Server::new(
        connect_participant_usecase,
        disconnect_participant_usecase,
        claim_presenter_usecase,
        release_presenter_usecase,
        add_entry_usecase,
        move_entry_usecase,
        remove_entry_usecase,
        update_playback_usecase,
        broadcast_chat_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
