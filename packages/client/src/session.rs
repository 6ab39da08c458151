//! WebSocket client session management.
//!
//! Three flows share one connection: canonical events from the server are
//! applied to the local [`SessionView`] and rendered; input lines become
//! proposals on an outbound channel; and a presenter sync loop periodically
//! re-announces the rendered playback position while this client presents.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use kotatsu_server::infrastructure::dto::websocket::ServerEvent;

use crate::{
    command::parse_command,
    domain::{Proposal, SessionView},
    error::ClientError,
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

/// Interval of the presenter playback re-announcement
const PRESENTER_SYNC_INTERVAL_SECS: u64 = 5;

/// Run the WebSocket client session
pub async fn run_client_session(
    url: &str,
    client_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    // Construct URL with client_id as query parameter
    let url = format!("{}?client_id={}", url, client_id);

    let (ws_stream, response) = match connect_async(&url).await {
        Ok(result) => result,
        Err(e) => {
            // Check if it's an HTTP error response
            let error_msg = e.to_string();

            // HTTP 409 Conflict: the client_id is taken
            if error_msg.contains("409") || error_msg.contains("Conflict") {
                return Err(Box::new(ClientError::DuplicateClientId(
                    client_id.to_string(),
                )));
            }
            // HTTP 503: the session is at capacity
            if error_msg.contains("503") || error_msg.contains("Service Unavailable") {
                return Err(Box::new(ClientError::SessionFull(client_id.to_string())));
            }

            return Err(Box::new(ClientError::ConnectionError(error_msg)));
        }
    };

    // Check HTTP status code from response
    match response.status().as_u16() {
        409 => {
            return Err(Box::new(ClientError::DuplicateClientId(
                client_id.to_string(),
            )));
        }
        503 => {
            return Err(Box::new(ClientError::SessionFull(client_id.to_string())));
        }
        _ => {}
    }

    tracing::info!("Connected to watch-together server!");
    println!(
        "\nYou are '{}'. Type /present to claim playback control, /add <url> to queue a video,\n\
         or plain text to chat. Press Ctrl+C to exit.\n",
        client_id
    );

    let (mut write, mut read) = ws_stream.split();
    let view = Arc::new(Mutex::new(SessionView::new(client_id.to_string())));

    // All senders (input loop, sync loop) funnel through one outbound channel
    // so the write half has a single owner
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();

    // Writer task: drain the outbound channel into the WebSocket
    let mut writer_task = tokio::spawn(async move {
        let mut write_error = false;
        while let Some(json) = outbound_rx.recv().await {
            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send message: {}", e);
                write_error = true;
                break;
            }
        }
        write_error
    });

    // Read task: apply canonical events to the view and render them
    let client_id_for_read = client_id.to_string();
    let view_for_read = view.clone();
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let event = match serde_json::from_str::<ServerEvent>(&text) {
                        Ok(event) => event,
                        Err(_) => {
                            print!("{}", MessageFormatter::format_raw_message(&text));
                            redisplay_prompt(&client_id_for_read);
                            continue;
                        }
                    };
                    let mut view = view_for_read.lock().await;
                    view.apply_event(&event, Instant::now());
                    let formatted = render_event(&view, &event, &client_id_for_read);
                    drop(view);
                    print!("{}", formatted);
                    redisplay_prompt(&client_id_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Presenter sync loop: re-announce the rendered position while playing
    let view_for_sync = view.clone();
    let outbound_for_sync = outbound_tx.clone();
    let sync_task = tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(Duration::from_secs(PRESENTER_SYNC_INTERVAL_SECS));
        loop {
            interval.tick().await;
            let view = view_for_sync.lock().await;
            if let Some(intent) = view.sync_intent(Instant::now()) {
                drop(view);
                let json = match serde_json::to_string(&intent) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!("Failed to serialize sync intent: {}", e);
                        continue;
                    }
                };
                if outbound_for_sync.send(json).is_err() {
                    break;
                }
            }
        }
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let client_id_for_prompt = client_id.to_string();
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", client_id_for_prompt);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Input task: parse lines into proposals and queue them for sending
    let client_id_for_input = client_id.to_string();
    let view_for_input = view.clone();
    let mut input_task = tokio::spawn(async move {
        while let Some(line) = input_rx.recv().await {
            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(e) => {
                    println!("{}", e);
                    redisplay_prompt(&client_id_for_input);
                    continue;
                }
            };

            let mut view = view_for_input.lock().await;
            match view.propose(command, Instant::now()) {
                Ok(Proposal::Send(intent)) => {
                    drop(view);
                    let json = match serde_json::to_string(&intent) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!("Failed to serialize proposal: {}", e);
                            continue;
                        }
                    };
                    if outbound_tx.send(json).is_err() {
                        break;
                    }
                }
                Ok(Proposal::ShowQueue) => {
                    print!("\n{}", MessageFormatter::format_queue(view.visible_queue()));
                    drop(view);
                    redisplay_prompt(&client_id_for_input);
                }
                Err(rejection) => {
                    drop(view);
                    println!("{}", rejection);
                    redisplay_prompt(&client_id_for_input);
                }
            }
        }
    });

    // If any one of the tasks completes, abort the others
    let result = tokio::select! {
        read_result = &mut read_task => {
            input_task.abort();
            let connection_error = read_result.unwrap_or(false);
            if connection_error {
                Err("Connection lost")
            } else {
                Ok(())
            }
        }
        write_result = &mut writer_task => {
            read_task.abort();
            input_task.abort();
            let write_error = write_result.unwrap_or(false);
            if write_error { Err("Connection lost") } else { Ok(()) }
        }
        _ = &mut input_task => {
            read_task.abort();
            Ok(())
        }
    };
    sync_task.abort();
    writer_task.abort();

    match result {
        Ok(()) => Ok(()),
        Err(msg) => Err(Box::new(ClientError::ConnectionError(msg.to_string()))),
    }
}

/// Render a canonical event against the freshly updated view
fn render_event(view: &SessionView, event: &ServerEvent, client_id: &str) -> String {
    match event {
        ServerEvent::SessionConnected { .. } => MessageFormatter::format_session_connected(
            &view.participants,
            view.visible_queue(),
            client_id,
        ),
        ServerEvent::RoleAssigned { role } => MessageFormatter::format_role_assigned(role),
        ServerEvent::ParticipantJoined {
            client_id,
            connected_at,
        } => MessageFormatter::format_participant_joined(client_id, *connected_at),
        ServerEvent::ParticipantLeft {
            client_id,
            disconnected_at,
        } => MessageFormatter::format_participant_left(client_id, *disconnected_at),
        ServerEvent::QueueAdded { entry } => MessageFormatter::format_queue_added(entry),
        ServerEvent::QueueReordered { .. } => {
            format!("\n{}", MessageFormatter::format_queue(view.visible_queue()))
        }
        ServerEvent::QueueRemoved { entry_id } => MessageFormatter::format_queue_removed(*entry_id),
        ServerEvent::PlaybackState { .. } => match &view.playback {
            Some(playback) => MessageFormatter::format_playback_state(playback),
            None => String::new(),
        },
        ServerEvent::PlaybackCleared {} => MessageFormatter::format_playback_cleared(),
        ServerEvent::ChatMessage {
            text,
            emitted_at,
            lane_y,
            ..
        } => MessageFormatter::format_chat_message(text, *emitted_at, *lane_y),
    }
}
