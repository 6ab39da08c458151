//! Data Transfer Objects (DTOs) for the watch-together application.
//!
//! DTOs are organized by protocol:
//! - `websocket`: the `{intent, payload}` wire envelope
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
