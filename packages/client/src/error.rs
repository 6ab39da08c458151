//! Error types for the watch-together client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client ID is already in use
    #[error("Client ID '{0}' is already connected")]
    DuplicateClientId(String),

    /// The session is at capacity
    #[error("Session is full, cannot join as '{0}'")]
    SessionFull(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
