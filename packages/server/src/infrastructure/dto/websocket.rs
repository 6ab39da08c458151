//! WebSocket wire envelope.
//!
//! Every message is a self-delimited JSON text frame of the shape
//! `{"intent": "...", "payload": {...}}`. Proposals flow client → server as
//! [`ClientIntent`]; canonical events flow server → clients as
//! [`ServerEvent`] and are applied unconditionally by every recipient,
//! replacing any optimistic local prediction.

use serde::{Deserialize, Serialize};

/// A queue entry as it appears on the wire.
///
/// `entryId` is the entry's logical timestamp and the only identity ever sent
/// across the network; `order` is informational and recomputed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntryDto {
    pub entry_id: u64,
    pub url: String,
    pub order: usize,
}

/// A participant as it appears in the connect snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub client_id: String,
    pub role: String,
    pub connected_at: i64,
}

/// Playback snapshot as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackDto {
    pub url: String,
    pub position_seconds: f64,
    pub paused: bool,
    pub volume: f64,
}

/// Proposals a participant may send to the engines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", content = "payload")]
pub enum ClientIntent {
    /// Queue Engine: append a video url
    #[serde(rename = "message added")]
    MessageAdded { message: String },

    /// Queue Engine: move an entry to a new order
    #[serde(rename = "reorder", rename_all = "camelCase")]
    Reorder { entry_id: u64, to_order: usize },

    /// Queue Engine: remove an entry
    #[serde(rename = "remove", rename_all = "camelCase")]
    Remove { entry_id: u64 },

    /// Role Authority: claim the presenter role
    #[serde(rename = "claim presenter")]
    ClaimPresenter {},

    /// Role Authority: release the presenter role
    #[serde(rename = "release presenter")]
    ReleasePresenter {},

    /// Playback Synchronizer: authoritative presenter snapshot
    #[serde(rename = "playback update", rename_all = "camelCase")]
    PlaybackUpdate {
        url: String,
        position_seconds: f64,
        paused: bool,
        volume: f64,
    },

    /// Chat Broadcaster: ephemeral message
    #[serde(rename = "chat")]
    Chat { text: String },
}

/// Canonical events broadcast by the engines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", content = "payload")]
pub enum ServerEvent {
    /// Full state snapshot pushed to a newly connected participant
    #[serde(rename = "session connected", rename_all = "camelCase")]
    SessionConnected {
        session_id: String,
        participants: Vec<ParticipantDto>,
        queue: Vec<QueueEntryDto>,
        playback: Option<PlaybackDto>,
    },

    /// The recipient's own role after a role transition
    #[serde(rename = "role assigned")]
    RoleAssigned { role: String },

    #[serde(rename = "participant joined", rename_all = "camelCase")]
    ParticipantJoined { client_id: String, connected_at: i64 },

    #[serde(rename = "participant left", rename_all = "camelCase")]
    ParticipantLeft {
        client_id: String,
        disconnected_at: i64,
    },

    #[serde(rename = "queue added")]
    QueueAdded { entry: QueueEntryDto },

    /// The complete new ordering, never a delta: last-applied-wins at the
    /// engine, full state re-broadcast to every client
    #[serde(rename = "queue reordered")]
    QueueReordered { order: Vec<QueueEntryDto> },

    #[serde(rename = "queue removed", rename_all = "camelCase")]
    QueueRemoved { entry_id: u64 },

    #[serde(rename = "playback state", rename_all = "camelCase")]
    PlaybackState {
        url: String,
        position_seconds: f64,
        paused: bool,
        volume: f64,
    },

    /// The queue ran empty and playback was destroyed
    #[serde(rename = "playback cleared")]
    PlaybackCleared {},

    #[serde(rename = "chat message", rename_all = "camelCase")]
    ChatMessage {
        text: String,
        emitted_at: i64,
        travel_time_seconds: f64,
        lane_y: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_intent_envelope_shape() {
        // テスト項目: ClientIntent が {intent, payload} 形式で直列化される
        // given (前提条件):
        let intent = ClientIntent::Reorder {
            entry_id: 3,
            to_order: 0,
        };

        // when (操作):
        let json = serde_json::to_value(&intent).unwrap();

        // then (期待する結果):
        assert_eq!(json["intent"], "reorder");
        assert_eq!(json["payload"]["entryId"], 3);
        assert_eq!(json["payload"]["toOrder"], 0);
    }

    #[test]
    fn test_client_intent_round_trip() {
        // テスト項目: 受信した JSON から ClientIntent が復元できる
        // given (前提条件):
        let raw = r#"{"intent":"playback update","payload":{"url":"v1","positionSeconds":42.0,"paused":false,"volume":0.8}}"#;

        // when (操作):
        let parsed: ClientIntent = serde_json::from_str(raw).unwrap();

        // then (期待する結果):
        assert_eq!(
            parsed,
            ClientIntent::PlaybackUpdate {
                url: "v1".to_string(),
                position_seconds: 42.0,
                paused: false,
                volume: 0.8,
            }
        );
    }

    #[test]
    fn test_claim_presenter_with_empty_payload() {
        // テスト項目: 空の payload を持つ claim presenter が受理される
        // given (前提条件):
        let raw = r#"{"intent":"claim presenter","payload":{}}"#;

        // when (操作):
        let parsed: ClientIntent = serde_json::from_str(raw).unwrap();

        // then (期待する結果):
        assert_eq!(parsed, ClientIntent::ClaimPresenter {});
    }

    #[test]
    fn test_malformed_payload_is_a_parse_error() {
        // テスト項目: 必須フィールドを欠いた payload がパースエラーになる
        // given (前提条件):
        let raw = r#"{"intent":"reorder","payload":{"toOrder":0}}"#;

        // when (操作):
        let parsed = serde_json::from_str::<ClientIntent>(raw);

        // then (期待する結果):
        assert!(parsed.is_err());
    }

    #[test]
    fn test_server_event_uses_camel_case_field_names() {
        // テスト項目: chat message イベントのフィールド名が camelCase で出力される
        // given (前提条件):
        let event = ServerEvent::ChatMessage {
            text: "hello".to_string(),
            emitted_at: 1000,
            travel_time_seconds: 10.0,
            lane_y: 0.25,
        };

        // when (操作):
        let json = serde_json::to_value(&event).unwrap();

        // then (期待する結果):
        assert_eq!(json["intent"], "chat message");
        assert_eq!(json["payload"]["emittedAt"], 1000);
        assert_eq!(json["payload"]["travelTimeSeconds"], 10.0);
        assert_eq!(json["payload"]["laneY"], 0.25);
    }

    #[test]
    fn test_queue_reordered_carries_full_order() {
        // テスト項目: queue reordered イベントが完全な順序を保持する
        // given (前提条件):
        let event = ServerEvent::QueueReordered {
            order: vec![
                QueueEntryDto {
                    entry_id: 1,
                    url: "y".to_string(),
                    order: 0,
                },
                QueueEntryDto {
                    entry_id: 0,
                    url: "x".to_string(),
                    order: 1,
                },
            ],
        };

        // when (操作):
        let json = serde_json::to_string(&event).unwrap();
        let parsed: ServerEvent = serde_json::from_str(&json).unwrap();

        // then (期待する結果):
        assert_eq!(parsed, event);
    }
}
