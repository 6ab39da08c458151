//! UseCase: ephemeral chat fan-out.
//!
//! Chat messages never touch session state. The server stamps the emission
//! time and picks a vertical lane, then every participant (the sender
//! included) receives the same message with the same shared travel time, so
//! a message crosses everyone's screen in lockstep.

use std::sync::Arc;

use rand::Rng;

use kotatsu_shared::time::Clock;

use crate::domain::{ChatMessage, ClientId, MessagePusher, SessionRepository, Timestamp};

pub struct BroadcastChatUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl BroadcastChatUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// Stamp a chat message with the server clock and a random lane
    pub fn stamp(&self, text: String) -> ChatMessage {
        let lane_y = rand::thread_rng().gen_range(0.0..1.0);
        ChatMessage::new(text, Timestamp::new(self.clock.now_millis()), lane_y)
    }

    /// Broadcast the serialized chat event to every connected participant,
    /// including the sender
    pub async fn broadcast_to_all(&self, message: &str) -> Result<Vec<ClientId>, String> {
        let targets = self.repository.get_all_connected_client_ids().await;
        self.message_pusher
            .broadcast(targets.clone(), message)
            .await
            .map_err(|e| e.to_string())?;
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Session, SessionIdFactory, TRAVEL_TIME_SECONDS},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository,
        },
    };
    use kotatsu_shared::time::FixedClock;
    use tokio::sync::Mutex;

    fn create_usecase() -> (BroadcastChatUseCase, Arc<WebSocketMessagePusher>) {
        let session = Arc::new(Mutex::new(Session::new(
            SessionIdFactory::generate(),
            Timestamp::new(1000),
        )));
        let repository = Arc::new(InMemorySessionRepository::new(session));
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = BroadcastChatUseCase::new(
            repository,
            pusher.clone(),
            Arc::new(FixedClock::new(1_700_000_000_000)),
        );
        (usecase, pusher)
    }

    #[tokio::test]
    async fn test_stamp_uses_server_clock_and_shared_travel_time() {
        // テスト項目: サーバ時刻と共有 travel time でメッセージが刻印される
        // given (前提条件):
        let (usecase, _) = create_usecase();

        // when (操作):
        let message = usecase.stamp("hello".to_string());

        // then (期待する結果):
        assert_eq!(message.emitted_at, Timestamp::new(1_700_000_000_000));
        assert_eq!(message.travel_time_seconds, TRAVEL_TIME_SECONDS);
        assert!((0.0..1.0).contains(&message.lane_y));
    }

    #[tokio::test]
    async fn test_chat_fan_out_includes_sender() {
        // テスト項目: 送信者自身もブロードキャスト対象に含まれる
        // given (前提条件):
        let (usecase, pusher) = create_usecase();
        let alice = ClientId::new("alice".to_string()).unwrap();
        let bob = ClientId::new("bob".to_string()).unwrap();
        usecase
            .repository
            .add_participant(alice.clone(), Timestamp::new(1000))
            .await
            .unwrap();
        usecase
            .repository
            .add_participant(bob.clone(), Timestamp::new(1000))
            .await
            .unwrap();
        let (alice_tx, mut alice_rx) = tokio::sync::mpsc::unbounded_channel();
        let (bob_tx, mut bob_rx) = tokio::sync::mpsc::unbounded_channel();
        pusher.register_client(alice, alice_tx).await;
        pusher.register_client(bob, bob_tx).await;

        // when (操作): alice がチャットを送信したとしてブロードキャスト
        let targets = usecase.broadcast_to_all("chat event").await.unwrap();

        // then (期待する結果):
        assert_eq!(targets.len(), 2);
        assert_eq!(alice_rx.recv().await, Some("chat event".to_string()));
        assert_eq!(bob_rx.recv().await, Some("chat event".to_string()));
    }
}
