//! Message formatting utilities for client display.

use kotatsu_server::infrastructure::dto::websocket::{ParticipantDto, QueueEntryDto};
use kotatsu_shared::time::timestamp_to_rfc3339;

use crate::domain::PlaybackView;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the session snapshot shown right after connecting
    pub fn format_session_connected(
        participants: &[ParticipantDto],
        queue: &[QueueEntryDto],
        current_client_id: &str,
    ) -> String {
        let mut output = String::new();
        output.push_str("\n\n============================================================\n");
        output.push_str("Participants:\n");

        if participants.is_empty() {
            output.push_str("(No participants)\n");
        } else {
            for participant in participants {
                let is_me = participant.client_id == current_client_id;
                let me_suffix = if is_me { " (me)" } else { "" };
                output.push_str(&format!(
                    "{}{} [{}] - entered at {}\n",
                    participant.client_id,
                    me_suffix,
                    participant.role,
                    timestamp_to_rfc3339(participant.connected_at)
                ));
            }
        }

        output.push_str(&Self::format_queue(queue));
        output.push_str("============================================================\n");
        output
    }

    /// Format the queue as a numbered list, head first
    pub fn format_queue(queue: &[QueueEntryDto]) -> String {
        let mut output = String::new();
        output.push_str("Queue:\n");
        if queue.is_empty() {
            output.push_str("(empty)\n");
        } else {
            for entry in queue {
                let playing = if entry.order == 0 { " <- playing" } else { "" };
                output.push_str(&format!(
                    "{}. [{}] {}{}\n",
                    entry.order, entry.entry_id, entry.url, playing
                ));
            }
        }
        output
    }

    /// Format a role transition for this client
    pub fn format_role_assigned(role: &str) -> String {
        format!("\n* You are now: {}\n", role)
    }

    /// Format a participant-joined notification
    pub fn format_participant_joined(client_id: &str, connected_at: i64) -> String {
        format!(
            "\n+ {} entered at {}\n",
            client_id,
            timestamp_to_rfc3339(connected_at)
        )
    }

    /// Format a participant-left notification
    pub fn format_participant_left(client_id: &str, disconnected_at: i64) -> String {
        format!(
            "\n- {} left at {}\n",
            client_id,
            timestamp_to_rfc3339(disconnected_at)
        )
    }

    /// Format a queue-added notification
    pub fn format_queue_added(entry: &QueueEntryDto) -> String {
        format!(
            "\n* Queued at {}: [{}] {}\n",
            entry.order, entry.entry_id, entry.url
        )
    }

    /// Format a queue-removed notification
    pub fn format_queue_removed(entry_id: u64) -> String {
        format!("\n* Removed entry [{}]\n", entry_id)
    }

    /// Format the authoritative playback snapshot
    pub fn format_playback_state(playback: &PlaybackView) -> String {
        let state = if playback.paused { "paused" } else { "playing" };
        format!(
            "\n* {} {} at {:.1}s (volume {:.0}%)\n",
            state,
            playback.url,
            playback.base_position_seconds,
            playback.volume * 100.0
        )
    }

    /// Format the end-of-queue notification
    pub fn format_playback_cleared() -> String {
        "\n* Queue ran empty; playback stopped\n".to_string()
    }

    /// Format a chat message crossing the screen
    pub fn format_chat_message(text: &str, emitted_at: i64, lane_y: f64) -> String {
        // lane_y picks the vertical offset; in the CLI we fake it with indent
        let indent = " ".repeat((lane_y * 20.0) as usize);
        format!(
            "\n{}~ {} ({})\n",
            indent,
            text,
            timestamp_to_rfc3339(emitted_at)
        )
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(entry_id: u64, url: &str, order: usize) -> QueueEntryDto {
        QueueEntryDto {
            entry_id,
            url: url.to_string(),
            order,
        }
    }

    #[test]
    fn test_format_session_connected_marks_me_and_roles() {
        // テスト項目: 接続スナップショットに自分のマークとロールが表示される
        // given (前提条件):
        let participants = vec![
            ParticipantDto {
                client_id: "alice".to_string(),
                role: "presenter".to_string(),
                connected_at: 1672498800000,
            },
            ParticipantDto {
                client_id: "bob".to_string(),
                role: "client".to_string(),
                connected_at: 1672498900000,
            },
        ];

        // when (操作):
        let result = MessageFormatter::format_session_connected(&participants, &[], "bob");

        // then (期待する結果):
        assert!(result.contains("bob (me) [client]"));
        assert!(result.contains("alice [presenter]"));
        assert!(result.contains("(empty)"));
    }

    #[test]
    fn test_format_queue_marks_head_as_playing() {
        // テスト項目: キュー表示で先頭エントリに再生中マークが付く
        // given (前提条件):
        let queue = vec![entry(0, "x", 0), entry(1, "y", 1)];

        // when (操作):
        let result = MessageFormatter::format_queue(&queue);

        // then (期待する結果):
        assert!(result.contains("0. [0] x <- playing"));
        assert!(result.contains("1. [1] y"));
        assert!(!result.contains("y <- playing"));
    }

    #[test]
    fn test_format_role_assigned() {
        // テスト項目: ロール通知が正しくフォーマットされる
        // given (前提条件):
        let role = "no presenter";

        // when (操作):
        let result = MessageFormatter::format_role_assigned(role);

        // then (期待する結果):
        assert!(result.contains("You are now: no presenter"));
    }

    #[test]
    fn test_format_participant_joined() {
        // テスト項目: 参加者参加通知が正しくフォーマットされる
        // given (前提条件):
        let client_id = "bob";
        let connected_at = 1672498800000;

        // when (操作):
        let result = MessageFormatter::format_participant_joined(client_id, connected_at);

        // then (期待する結果):
        assert!(result.contains("+ bob"));
        assert!(result.contains("entered at"));
        assert!(result.contains("2023-01-01"));
    }

    #[test]
    fn test_format_chat_message_indents_by_lane() {
        // テスト項目: チャット表示のインデントがレーンに応じて変わる
        // given (前提条件):

        // when (操作):
        let top = MessageFormatter::format_chat_message("hi", 1672498800000, 0.0);
        let lower = MessageFormatter::format_chat_message("hi", 1672498800000, 0.9);

        // then (期待する結果):
        assert!(top.contains("~ hi"));
        assert!(lower.starts_with("\n                  "));
    }
}
