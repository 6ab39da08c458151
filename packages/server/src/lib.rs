//! Watch-together synchronization server library.
//!
//! One participant at a time acts as the authoritative presenter whose
//! playback is mirrored by every other participant; the shared video queue
//! and ephemeral chat are reconciled server-side and re-broadcast as
//! canonical events over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
