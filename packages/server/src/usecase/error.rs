//! UseCase layer errors.

use thiserror::Error;

/// Errors raised while connecting a participant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("client_id '{0}' is already connected")]
    DuplicateClientId(String),

    #[error("session participant capacity exceeded")]
    SessionFull,
}
