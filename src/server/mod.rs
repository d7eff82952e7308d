//! WebSocket server front-end for the relay

pub mod config;
mod connection;
pub mod listener;

pub use config::ServerConfig;
pub use listener::SignalServer;
