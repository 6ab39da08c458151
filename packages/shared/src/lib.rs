//! Shared utilities for the kotatsu watch-together application.
//!
//! Common code used by both the server and the CLI client:
//! logging setup and time utilities with a clock abstraction.

pub mod logger;
pub mod time;
