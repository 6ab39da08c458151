//! MessagePusher trait definition.
//!
//! The domain layer defines the notification interface it needs; the concrete
//! WebSocket implementation lives in the infrastructure layer (dependency
//! inversion). Engines hand pre-serialized canonical events to the pusher and
//! never touch a socket themselves.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::value_object::ClientId;

/// Per-participant channel used to push messages towards one WebSocket
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client not found: '{0}'")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// Abstraction over the outbound message path
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register a client's push channel
    async fn register_client(&self, client_id: ClientId, sender: PusherChannel);

    /// Unregister a client's push channel
    async fn unregister_client(&self, client_id: &ClientId);

    /// Push a message to a single client
    async fn push_to(&self, client_id: &ClientId, content: &str) -> Result<(), MessagePushError>;

    /// Push a message to every listed client. Partial delivery failure is
    /// tolerated: a disconnected recipient is skipped, not retried.
    async fn broadcast(
        &self,
        targets: Vec<ClientId>,
        content: &str,
    ) -> Result<(), MessagePushError>;
}
