//! UseCase: presenter claim.
//!
//! A claim while another presenter is live is rejected with `RoleConflict`
//! and nothing is broadcast; the rejected claimant simply keeps its current
//! role. On success the updated roster is returned so the UI layer can push
//! each participant its own `role assigned` event.

use std::sync::Arc;

use crate::domain::{ClientId, MessagePusher, Participant, SessionError, SessionRepository};

pub struct ClaimPresenterUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ClaimPresenterUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// Claim the presenter role; returns the roster after the transition
    pub async fn execute(&self, client_id: ClientId) -> Result<Vec<Participant>, SessionError> {
        self.repository.claim_presenter(&client_id).await?;
        Ok(self.repository.get_participants().await)
    }

    /// Push a participant its own role assignment
    pub async fn push_role(&self, target: &ClientId, message: &str) {
        if let Err(e) = self.message_pusher.push_to(target, message).await {
            tracing::warn!(
                "Failed to push role assignment to '{}': {}",
                target.as_str(),
                e
            );
        }
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
    ) -> (ClaimPresenterUseCase, Arc<InMemorySessionRepository>) {
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
        let usecase = ClaimPresenterUseCase::new(
            repository.clone(),
            Arc::new(WebSocketMessagePusher::new()),
        );
        (usecase, repository)
    }

    #[tokio::test]
    async fn test_claim_returns_refreshed_roster() {
        // テスト項目: クレーム成功時に更新されたロール一覧が返される
        // given (前提条件):
        let (usecase, _repository) = create_usecase_with_participants(&["alice", "bob"]).await;

        // when (操作):
        let roster = usecase.execute(client_id("alice")).await.unwrap();

        // then (期待する結果):
        let alice = roster.iter().find(|p| p.id.as_str() == "alice").unwrap();
        let bob = roster.iter().find(|p| p.id.as_str() == "bob").unwrap();
        assert_eq!(alice.role, Role::Presenter);
        assert_eq!(bob.role, Role::Client);
    }

    #[tokio::test]
    async fn test_second_claim_is_rejected() {
        // テスト項目: 2人目のクレームが RoleConflict で拒否される（シナリオ1）
        // given (前提条件):
        let (usecase, _repository) = create_usecase_with_participants(&["alice", "bob"]).await;
        usecase.execute(client_id("alice")).await.unwrap();

        // when (操作):
        let result = usecase.execute(client_id("bob")).await;

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::RoleConflict("alice".to_string())));
    }
}
