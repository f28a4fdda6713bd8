//! Two-player matchmaking and relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin duelroom-server
//! cargo run --bin duelroom-server -- --host 127.0.0.1 --port 3000
//! PORT=3000 READY_TIMEOUT_SECS=30 cargo run --bin duelroom-server
//! ```

use clap::Parser;
use duelroom_server::{config::Args, ui::Server};
use duelroom_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(&[env!("CARGO_PKG_NAME"), "tower_http"], &args.log_level);

    let ready_timeout = args.ready_timeout();
    if let Some(timeout) = ready_timeout {
        tracing::info!("Ready handshake timeout: {}s", timeout.as_secs());
    }

    let server = Server::in_memory(ready_timeout);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
