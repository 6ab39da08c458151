//! UseCase: authoritative playback propagation.
//!
//! Only the live presenter's updates pass the authority filter; anything
//! else (wrong role, url racing a queue change) is dropped silently and
//! never broadcast. Accepted updates are re-broadcast verbatim to every
//! participant, including the presenter.

use std::sync::Arc;

use crate::domain::{ClientId, MessagePusher, PlaybackState, SessionError, SessionRepository};

use super::BroadcastGate;

pub struct UpdatePlaybackUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    gate: BroadcastGate,
}

impl UpdatePlaybackUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        gate: BroadcastGate,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            gate,
        }
    }

    /// Apply a presenter update and broadcast the pre-serialized canonical
    /// event to all participants. Returns the broadcast targets. The gate
    /// keeps the broadcast ordered with concurrent queue mutations.
    pub async fn execute(
        &self,
        client_id: ClientId,
        state: PlaybackState,
        message_json: String,
    ) -> Result<Vec<ClientId>, SessionError> {
        let _ordering = self.gate.lock().await;

        self.repository.apply_playback(&client_id, state).await?;

        let targets = self.repository.get_all_connected_client_ids().await;
        if let Err(e) = self
            .message_pusher
            .broadcast(targets.clone(), &message_json)
            .await
        {
            tracing::warn!("Failed to broadcast playback state: {}", e);
        }
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            MessagePushError, PusherChannel, Session, SessionIdFactory, Timestamp, VideoUrl,
            Volume,
        },
        infrastructure::repository::InMemorySessionRepository,
    };
    use async_trait::async_trait;
    use mockall::mock;
    use tokio::sync::Mutex;

    mock! {
        Pusher {}

        #[async_trait]
        impl MessagePusher for Pusher {
            async fn register_client(&self, client_id: ClientId, sender: PusherChannel);
            async fn unregister_client(&self, client_id: &ClientId);
            async fn push_to(
                &self,
                client_id: &ClientId,
                content: &str,
            ) -> Result<(), MessagePushError>;
            async fn broadcast(
                &self,
                targets: Vec<ClientId>,
                content: &str,
            ) -> Result<(), MessagePushError>;
        }
    }

    fn client_id(raw: &str) -> ClientId {
        ClientId::new(raw.to_string()).unwrap()
    }

    fn playback(url: &str, position: f64) -> PlaybackState {
        PlaybackState {
            url: VideoUrl::new(url.to_string()).unwrap(),
            position_seconds: position,
            paused: false,
            volume: Volume::new(1.0).unwrap(),
        }
    }

    async fn create_repository_with_presenter() -> Arc<InMemorySessionRepository> {
        let session = Arc::new(Mutex::new(Session::new(
            SessionIdFactory::generate(),
            Timestamp::new(1000),
        )));
        let repository = Arc::new(InMemorySessionRepository::new(session));
        repository
            .add_participant(client_id("alice"), Timestamp::new(1000))
            .await
            .unwrap();
        repository
            .add_participant(client_id("bob"), Timestamp::new(1000))
            .await
            .unwrap();
        repository
            .claim_presenter(&client_id("alice"))
            .await
            .unwrap();
        repository
            .enqueue(VideoUrl::new("v1".to_string()).unwrap())
            .await;
        repository
    }

    #[tokio::test]
    async fn test_presenter_update_is_broadcast_to_all() {
        // テスト項目: プレゼンターの更新が全参加者へブロードキャストされる
        // given (前提条件):
        let repository = create_repository_with_presenter().await;
        let mut pusher = MockPusher::new();
        pusher
            .expect_broadcast()
            .withf(|targets, content| targets.len() == 2 && content == "canonical playback")
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = UpdatePlaybackUseCase::new(repository, Arc::new(pusher), Arc::new(Mutex::new(())));

        // when (操作):
        let result = usecase
            .execute(
                client_id("alice"),
                playback("v1", 42.0),
                "canonical playback".to_string(),
            )
            .await;

        // then (期待する結果):
        assert_eq!(result.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_non_presenter_update_is_never_broadcast() {
        // テスト項目: プレゼンター以外の更新が破棄され、ブロードキャストが発生しない
        // given (前提条件):
        let repository = create_repository_with_presenter().await;
        let mut pusher = MockPusher::new();
        pusher.expect_broadcast().times(0);
        let usecase = UpdatePlaybackUseCase::new(repository.clone(), Arc::new(pusher), Arc::new(Mutex::new(())));

        // when (操作):
        let result = usecase
            .execute(
                client_id("bob"),
                playback("v1", 99.0),
                "stale playback".to_string(),
            )
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::NotPresenter("bob".to_string())));
        let session = repository.get_session().await;
        assert!(session.playback.is_none());
    }

    #[tokio::test]
    async fn test_mismatched_url_update_is_never_broadcast() {
        // テスト項目: 先頭エントリと異なる url の更新が破棄される
        // given (前提条件):
        let repository = create_repository_with_presenter().await;
        let mut pusher = MockPusher::new();
        pusher.expect_broadcast().times(0);
        let usecase = UpdatePlaybackUseCase::new(repository, Arc::new(pusher), Arc::new(Mutex::new(())));

        // when (操作):
        let result = usecase
            .execute(
                client_id("alice"),
                playback("v0", 5.0),
                "stale playback".to_string(),
            )
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SessionError::StalePlaybackUpdate("v0".to_string()))
        );
    }
}
