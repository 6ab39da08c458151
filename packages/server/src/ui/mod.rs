//! Watch-together WebSocket server implementation.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
