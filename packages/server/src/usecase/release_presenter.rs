//! UseCase: presenter release.
//!
//! Only the current presenter may release. Afterwards nobody holds the role,
//! so the whole roster falls back to the session-wide `no presenter`
//! condition; playback stays frozen until a new claim.

use std::sync::Arc;

use crate::domain::{ClientId, MessagePusher, Participant, SessionError, SessionRepository};

pub struct ReleasePresenterUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ReleasePresenterUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// Release the presenter role; returns the roster after the transition
    pub async fn execute(&self, client_id: ClientId) -> Result<Vec<Participant>, SessionError> {
        self.repository.release_presenter(&client_id).await?;
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
