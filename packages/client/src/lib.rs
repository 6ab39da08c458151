//! CLI client for the kotatsu watch-together server.
//!
//! The client keeps a local [`domain::SessionView`] mirrored from canonical
//! server events, applies optimistic queue predictions for its own proposals,
//! and extrapolates playback position at wall-clock rate between
//! authoritative snapshots.

pub mod command;
pub mod domain;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;
pub mod ui;
