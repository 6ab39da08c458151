//! Watch-together CLI client.
//!
//! Connects to a kotatsu server, mirrors the canonical session state and
//! sends proposals from stdin: `/present`, `/add <url>`, `/move`, `/rm`,
//! `/play`, `/pause`, `/seek`, `/vol`, `/queue`, or plain text to chat.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second
//! interval). Duplicate client_id connections are rejected by the server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kotatsu-client -- --client-id Alice
//! cargo run --bin kotatsu-client -- -c Bob
//! ```

use clap::Parser;

use kotatsu_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "kotatsu-client")]
#[command(about = "Watch-together CLI client", long_about = None)]
struct Args {
    /// Client ID identifying this participant (must be unique)
    #[arg(short = 'c', long)]
    client_id: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = kotatsu_client::runner::run_client(args.url, args.client_id).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
