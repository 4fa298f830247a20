//! Signaling relay server for peer-to-peer video calls.
//!
//! Tracks room membership over WebSocket and relays chat / display-name
//! events so browser clients can establish direct media connections.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tamari-server
//! cargo run --bin tamari-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use tamari::{
    common::logger::setup_logger,
    infrastructure::{message_pusher::WebSocketMessagePusher, relay::EventRelay},
    ui::Server,
    usecase::MembershipCoordinator,
};

#[derive(Parser, Debug)]
#[command(name = "tamari-server")]
#[command(about = "Signaling relay server for peer-to-peer video calls", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "3000")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Wire dependencies: registry/coordinator, pusher, relay, server
    let coordinator = Arc::new(MembershipCoordinator::new());
    let pusher = Arc::new(WebSocketMessagePusher::new());
    let relay = Arc::new(EventRelay::new(coordinator.clone(), pusher));

    let server = Server::new(relay, coordinator);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
