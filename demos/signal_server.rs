//! Standalone signaling relay
//!
//! Run with: cargo run --example signal_server [BIND_ADDR]
//!
//! Examples:
//!   cargo run --example signal_server                    # binds to 0.0.0.0:8765
//!   cargo run --example signal_server localhost          # binds to 127.0.0.1:8765
//!   cargo run --example signal_server 127.0.0.1:9000     # binds to 127.0.0.1:9000
//!
//! ## Clients
//!
//! The broadcaster connects to ws://HOST:PORT and sends `{"client_type":"sender"}`
//! (or directly an SDP offer). Viewers send `{"client_type":"viewer"}`, then
//! exchange answers and ICE candidates. Every client first receives
//! `{"type":"registration_successful","client_id":...}`.
//!
//! Set `RUST_LOG=signal_relay=debug` for per-message routing detail.

use std::net::SocketAddr;

use signal_relay::server::config::DEFAULT_PORT;
use signal_relay::{ServerConfig, SignalServer};

/// Parse bind address from command line argument.
///
/// Accepts formats:
/// - "localhost" -> 127.0.0.1:8765
/// - "localhost:9000" -> 127.0.0.1:9000
/// - "127.0.0.1" -> 127.0.0.1:8765
/// - "0.0.0.0:9000" -> 0.0.0.0:9000
fn parse_bind_addr(arg: &str) -> Result<SocketAddr, String> {
    let normalized = arg.replace("localhost", "127.0.0.1");

    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    if let Ok(ip) = normalized.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    Err(format!(
        "Invalid bind address: '{}'. Expected format: IP:PORT or IP or 'localhost'",
        arg
    ))
}

fn print_usage() {
    eprintln!("Usage: signal_server [BIND_ADDR]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  BIND_ADDR    Address to bind to (default: 0.0.0.0:{})", DEFAULT_PORT);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let config = match args.get(1) {
        Some(addr_str) => match parse_bind_addr(addr_str) {
            Ok(addr) => ServerConfig::with_addr(addr),
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        },
        None => ServerConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("signal_relay=info".parse()?)
                .add_directive("signal_server=info".parse()?),
        )
        .init();

    let server = SignalServer::new(config);
    let relay = std::sync::Arc::clone(server.relay());

    server
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    let stats = relay.stats().snapshot();
    tracing::info!(
        connections = stats.total_connections,
        forwarded = stats.messages_forwarded,
        dropped = stats.messages_dropped,
        "Server shut down"
    );

    Ok(())
}
