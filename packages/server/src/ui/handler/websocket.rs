//! WebSocket connection handlers.
//!
//! Inbound frames are parsed into [`ClientIntent`] proposals and dispatched
//! to the usecase layer; canonical [`ServerEvent`]s are serialized here and
//! handed to the message pusher. A proposal that is rejected (role conflict,
//! stale playback, unknown entry) produces no broadcast at all: the proposer
//! discovers the outcome from the absence of a canonical event.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ClientId, HeadChange, PlaybackState, Role, Timestamp, VideoUrl, Volume},
    infrastructure::dto::{
        conversion::{
            playback_state_event, queue_entry_dto, queue_order_dtos, session_connected_event,
        },
        websocket::{ClientIntent, ServerEvent},
    },
    ui::state::AppState,
};
use kotatsu_shared::time::now_timestamp;

use serde::Deserialize;

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub client_id: String,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let client_id_str = query.client_id;

    // Convert String -> ClientId (Domain Model)
    let client_id = match ClientId::try_from(client_id_str.clone()) {
        Ok(id) => id,
        Err(_) => {
            tracing::warn!("Invalid client_id format: '{}'", client_id_str);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    // Create a channel for this client to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    // Use ConnectParticipantUseCase to handle connection
    // (register_client is called inside the UseCase)
    let client_id_for_handle = client_id.clone();
    match state
        .connect_participant_usecase
        .execute(client_id, tx)
        .await
    {
        Ok((connected_at, role)) => {
            tracing::info!(
                "Client '{}' connected as '{}'",
                client_id_str,
                role.as_str()
            );
            Ok(ws.on_upgrade(move |socket| {
                handle_socket(
                    socket,
                    state,
                    client_id_str,
                    rx,
                    connected_at,
                    role,
                    client_id_for_handle,
                )
            }))
        }
        Err(crate::usecase::ConnectError::DuplicateClientId(_)) => {
            tracing::warn!(
                "Client with ID '{}' is already connected. Rejecting connection.",
                client_id_str
            );
            Err(StatusCode::CONFLICT)
        }
        Err(crate::usecase::ConnectError::SessionFull) => {
            tracing::warn!(
                "Session capacity exceeded. Cannot add participant '{}'",
                client_id_str
            );
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: canonical events from the
/// engines (via rx channel) are sent to this client's WebSocket connection.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the message to this client
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

#[allow(clippy::too_many_arguments)]
async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    client_id_str: String,
    rx: mpsc::UnboundedReceiver<String>,
    connected_at: Timestamp,
    role: Role,
    client_id: ClientId,
) {
    let (mut sender, mut receiver) = socket.split();

    // Send the full session snapshot to the newly connected participant
    {
        let session = state.connect_participant_usecase.snapshot().await;
        let snapshot_json = serde_json::to_string(&session_connected_event(&session)).unwrap();
        if let Err(e) = sender.send(Message::Text(snapshot_json.into())).await {
            tracing::error!(
                "Failed to send session snapshot to '{}': {}",
                client_id_str,
                e
            );
            return;
        }

        // ... followed by its own role
        let role_json = serde_json::to_string(&ServerEvent::RoleAssigned {
            role: role.as_str().to_string(),
        })
        .unwrap();
        if let Err(e) = sender.send(Message::Text(role_json.into())).await {
            tracing::error!("Failed to send role to '{}': {}", client_id_str, e);
            return;
        }
        tracing::info!("Sent session snapshot to '{}'", client_id_str);
    }

    // Broadcast participant-joined to all other clients
    {
        let joined_json = serde_json::to_string(&ServerEvent::ParticipantJoined {
            client_id: client_id_str.clone(),
            connected_at: connected_at.value(),
        })
        .unwrap();
        if let Err(e) = state
            .connect_participant_usecase
            .broadcast_participant_joined(&client_id, &joined_json)
            .await
        {
            tracing::warn!("Failed to broadcast participant-joined: {}", e);
        }
    }

    let client_id_for_recv = client_id.clone();
    let client_id_str_clone = client_id_str.clone();
    let state_clone = state.clone();

    // Spawn a task to receive proposals from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let intent = match serde_json::from_str::<ClientIntent>(&text) {
                        Ok(intent) => intent,
                        Err(e) => {
                            tracing::warn!(
                                "Dropping malformed frame from '{}': {}",
                                client_id_str_clone,
                                e
                            );
                            continue;
                        }
                    };
                    handle_intent(&state_clone, &client_id_for_recv, intent).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", client_id_str_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to receive canonical events and send to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Use DisconnectParticipantUseCase to handle disconnection
    let outcome = state
        .disconnect_participant_usecase
        .execute(client_id.clone())
        .await;
    tracing::info!(
        "Client '{}' disconnected and removed from registry",
        client_id_str
    );

    // Broadcast participant-left to all remaining clients
    let left_json = serde_json::to_string(&ServerEvent::ParticipantLeft {
        client_id: client_id_str.clone(),
        disconnected_at: now_timestamp(),
    })
    .unwrap();
    let remaining_ids: Vec<ClientId> = outcome.remaining.iter().map(|p| p.id.clone()).collect();
    if let Err(e) = state
        .disconnect_participant_usecase
        .broadcast(remaining_ids, &left_json)
        .await
    {
        tracing::warn!("Failed to broadcast participant-left: {}", e);
    }

    // A presenter disconnect demotes everyone; tell each survivor its new role
    if outcome.was_presenter {
        tracing::info!(
            "Presenter '{}' left; session has no presenter",
            client_id_str
        );
        for participant in &outcome.remaining {
            let role_json = serde_json::to_string(&ServerEvent::RoleAssigned {
                role: participant.role.as_str().to_string(),
            })
            .unwrap();
            state
                .disconnect_participant_usecase
                .push_to(&participant.id, &role_json)
                .await;
        }
    }
}

/// Dispatch a parsed proposal to its usecase and broadcast the canonical
/// outcome. Rejected proposals log and fall through without a broadcast.
async fn handle_intent(state: &Arc<AppState>, client_id: &ClientId, intent: ClientIntent) {
    match intent {
        ClientIntent::MessageAdded { message } => {
            let url = match VideoUrl::new(message) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Rejecting queue add from '{}': {}", client_id.as_str(), e);
                    return;
                }
            };
            state
                .add_entry_usecase
                .execute(url, |entry, order| {
                    serde_json::to_string(&ServerEvent::QueueAdded {
                        entry: queue_entry_dto(entry, order),
                    })
                    .unwrap()
                })
                .await;
        }

        ClientIntent::Reorder { entry_id, to_order } => {
            let entry_id = crate::domain::EntryId::new(entry_id);
            let result = state
                .move_entry_usecase
                .execute(entry_id, to_order, |order, head_change| {
                    let mut events = vec![
                        serde_json::to_string(&ServerEvent::QueueReordered {
                            order: queue_order_dtos(order),
                        })
                        .unwrap(),
                    ];
                    if let Some(event) = head_change_event(head_change) {
                        events.push(serde_json::to_string(&event).unwrap());
                    }
                    events
                })
                .await;
            if let Err(e) = result {
                // moot proposal (e.g. entry removed concurrently)
                tracing::info!("Dropping reorder from '{}': {}", client_id.as_str(), e);
            }
        }

        ClientIntent::Remove { entry_id } => {
            let entry_id = crate::domain::EntryId::new(entry_id);
            let result = state
                .remove_entry_usecase
                .execute(entry_id, |head_change| {
                    let mut events = vec![
                        serde_json::to_string(&ServerEvent::QueueRemoved {
                            entry_id: entry_id.value(),
                        })
                        .unwrap(),
                    ];
                    if let Some(event) = head_change_event(head_change) {
                        events.push(serde_json::to_string(&event).unwrap());
                    }
                    events
                })
                .await;
            if let Err(e) = result {
                tracing::info!("Dropping remove from '{}': {}", client_id.as_str(), e);
            }
        }

        ClientIntent::ClaimPresenter {} => {
            match state.claim_presenter_usecase.execute(client_id.clone()).await {
                Ok(roster) => {
                    tracing::info!("Client '{}' is now the presenter", client_id.as_str());
                    for participant in &roster {
                        let role_json = serde_json::to_string(&ServerEvent::RoleAssigned {
                            role: participant.role.as_str().to_string(),
                        })
                        .unwrap();
                        state
                            .claim_presenter_usecase
                            .push_role(&participant.id, &role_json)
                            .await;
                    }
                }
                Err(e) => {
                    tracing::info!("Rejecting claim from '{}': {}", client_id.as_str(), e);
                }
            }
        }

        ClientIntent::ReleasePresenter {} => {
            match state
                .release_presenter_usecase
                .execute(client_id.clone())
                .await
            {
                Ok(roster) => {
                    tracing::info!("Client '{}' released the presenter role", client_id.as_str());
                    for participant in &roster {
                        let role_json = serde_json::to_string(&ServerEvent::RoleAssigned {
                            role: participant.role.as_str().to_string(),
                        })
                        .unwrap();
                        state
                            .release_presenter_usecase
                            .push_role(&participant.id, &role_json)
                            .await;
                    }
                }
                Err(e) => {
                    tracing::info!("Rejecting release from '{}': {}", client_id.as_str(), e);
                }
            }
        }

        ClientIntent::PlaybackUpdate {
            url,
            position_seconds,
            paused,
            volume,
        } => {
            let playback = match (VideoUrl::new(url), Volume::new(volume)) {
                (Ok(url), Ok(volume)) => PlaybackState {
                    url,
                    position_seconds,
                    paused,
                    volume,
                },
                (Err(e), _) => {
                    tracing::warn!("Invalid playback url from '{}': {}", client_id.as_str(), e);
                    return;
                }
                (_, Err(e)) => {
                    tracing::warn!("Invalid volume from '{}': {}", client_id.as_str(), e);
                    return;
                }
            };
            let event_json = serde_json::to_string(&playback_state_event(&playback)).unwrap();
            if let Err(e) = state
                .update_playback_usecase
                .execute(client_id.clone(), playback, event_json)
                .await
            {
                // non-presenter or stale update: dropped without a broadcast
                tracing::debug!(
                    "Dropping playback update from '{}': {}",
                    client_id.as_str(),
                    e
                );
            }
        }

        ClientIntent::Chat { text } => {
            let chat = state.broadcast_chat_usecase.stamp(text);
            let event_json = serde_json::to_string(&ServerEvent::from(&chat)).unwrap();
            if let Err(e) = state
                .broadcast_chat_usecase
                .broadcast_to_all(&event_json)
                .await
            {
                tracing::warn!("Failed to broadcast chat: {}", e);
            }
        }
    }
}

/// The playback consequence of a queue mutation, if any
fn head_change_event(head_change: &HeadChange) -> Option<ServerEvent> {
    match head_change {
        HeadChange::Unchanged => None,
        HeadChange::Reset(playback) => Some(playback_state_event(playback)),
        HeadChange::Cleared => Some(ServerEvent::PlaybackCleared {}),
    }
}
