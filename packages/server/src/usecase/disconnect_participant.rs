//! UseCase: 参加者切断処理
//!
//! 参加者を登録から外し、切断したのがプレゼンターだった場合は残りの全参加者を
//! no presenter に戻す。再生状態は最後の正式なスナップショットのまま凍結され、
//! 新しいプレゼンターがクレームするまで誰も再生を制御できない。

use std::sync::Arc;

use crate::domain::{ClientId, MessagePusher, Participant, SessionRepository};

/// Result of removing a participant from the session
#[derive(Debug, Clone, PartialEq)]
pub struct DisconnectOutcome {
    /// Whether the disconnected participant held the presenter role
    pub was_presenter: bool,
    /// Roster after the removal, with refreshed roles
    pub remaining: Vec<Participant>,
}

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// Disconnect a participant and report the resulting roster
    pub async fn execute(&self, client_id: ClientId) -> DisconnectOutcome {
        let was_presenter = self.repository.remove_participant(&client_id).await;
        self.message_pusher.unregister_client(&client_id).await;

        let remaining = self.repository.get_participants().await;
        DisconnectOutcome {
            was_presenter,
            remaining,
        }
    }

    /// Push a message to a single remaining participant
    pub async fn push_to(&self, target: &ClientId, message: &str) {
        if let Err(e) = self.message_pusher.push_to(target, message).await {
            tracing::warn!("Failed to push to client '{}': {}", target.as_str(), e);
        }
    }

    /// Broadcast a message to all remaining participants
    pub async fn broadcast(&self, targets: Vec<ClientId>, message: &str) -> Result<(), String> {
        self.message_pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Role, Session, SessionIdFactory, Timestamp},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository,
        },
    };
    use tokio::sync::Mutex;

    fn client_id(raw: &str) -> ClientId {
        ClientId::new(raw.to_string()).unwrap()
    }

    async fn create_usecase_with_participants(
        raws: &[&str],
    ) -> (DisconnectParticipantUseCase, Arc<InMemorySessionRepository>) {
        let session = Arc::new(Mutex::new(Session::new(
            SessionIdFactory::generate(),
            Timestamp::new(1000),
        )));
        let repository = Arc::new(InMemorySessionRepository::new(session));
        for raw in raws {
            repository
                .add_participant(client_id(raw), Timestamp::new(1000))
                .await
                .unwrap();
        }
        let usecase = DisconnectParticipantUseCase::new(
            repository.clone(),
            Arc::new(WebSocketMessagePusher::new()),
        );
        (usecase, repository)
    }

    #[tokio::test]
    async fn test_disconnect_client_keeps_roles() {
        // テスト項目: client の切断では残りの参加者のロールが変化しない
        // given (前提条件):
        let (usecase, repository) = create_usecase_with_participants(&["alice", "bob"]).await;
        repository
            .claim_presenter(&client_id("alice"))
            .await
            .unwrap();

        // when (操作):
        let outcome = usecase.execute(client_id("bob")).await;

        // then (期待する結果):
        assert!(!outcome.was_presenter);
        assert_eq!(outcome.remaining.len(), 1);
        assert_eq!(outcome.remaining[0].role, Role::Presenter);
    }

    #[tokio::test]
    async fn test_disconnect_presenter_demotes_remaining() {
        // テスト項目: プレゼンター切断で残りの全参加者が no presenter になる
        // given (前提条件):
        let (usecase, repository) =
            create_usecase_with_participants(&["alice", "bob", "charlie"]).await;
        repository
            .claim_presenter(&client_id("alice"))
            .await
            .unwrap();

        // when (操作):
        let outcome = usecase.execute(client_id("alice")).await;

        // then (期待する結果):
        assert!(outcome.was_presenter);
        assert_eq!(outcome.remaining.len(), 2);
        for p in &outcome.remaining {
            assert_eq!(p.role, Role::NoPresenter);
        }
    }
}
