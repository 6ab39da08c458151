//! UseCase: 参加者接続処理
//!
//! 重複 client_id と容量超過を検証し、参加者を登録して初期ロールを割り当てる。
//! プレゼンターが存在する間の参加者は client、不在なら no presenter になる。

use std::sync::Arc;

use kotatsu_shared::time::Clock;

use crate::domain::{
    ClientId, MessagePusher, PusherChannel, Role, Session, SessionRepository, Timestamp,
};

use super::error::ConnectError;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectParticipantUseCase {
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

    /// Connect a participant.
    ///
    /// # Returns
    ///
    /// The connection timestamp and the role the participant was assigned.
    pub async fn execute(
        &self,
        client_id: ClientId,
        sender: PusherChannel,
    ) -> Result<(Timestamp, Role), ConnectError> {
        // 1. duplicate check
        let client_ids = self.repository.get_all_connected_client_ids().await;
        if client_ids.iter().any(|id| id == &client_id) {
            return Err(ConnectError::DuplicateClientId(
                client_id.as_str().to_string(),
            ));
        }

        // 2. register the participant in the session
        let connected_at = Timestamp::new(self.clock.now_millis());
        let role = self
            .repository
            .add_participant(client_id.clone(), connected_at)
            .await
            .map_err(|_| ConnectError::SessionFull)?;

        // 3. register the push channel
        self.message_pusher.register_client(client_id, sender).await;

        Ok((connected_at, role))
    }

    /// Full session snapshot for the connect-time state push
    pub async fn snapshot(&self) -> Session {
        self.repository.get_session().await
    }

    /// Broadcast a joined notification to everyone except the new participant
    pub async fn broadcast_participant_joined(
        &self,
        new_client_id: &ClientId,
        message: &str,
    ) -> Result<(), String> {
        let all_client_ids = self.repository.get_all_connected_client_ids().await;
        let target_ids: Vec<ClientId> = all_client_ids
            .into_iter()
            .filter(|id| id != new_client_id)
            .collect();

        self.message_pusher
            .broadcast(target_ids, message)
            .await
            .map_err(|e| e.to_string())
    }
}
