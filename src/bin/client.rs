//! CLI chat client.
//!
//! Connects to a chat server, announces the display name, then relays
//! typed lines to the server and prints whatever the server sends back.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin client -- alice
//! cargo run --bin client -- alice --host 192.168.0.10 --port 3000
//! ```

use clap::Parser;
use idobata::{client::run_client, common::logger::setup_logger};

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "CLI client for the multi-channel TCP chat server", long_about = None)]
struct Args {
    /// Display name announced to the server
    name: String,

    /// Remote server address
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Remote server port
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let args = Args::parse();

    if let Err(e) = run_client(args.name, args.host, args.port).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
