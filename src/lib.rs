//! WebRTC signaling relay
//!
//! Matches one broadcasting sender to many viewers and shuttles SDP offers,
//! answers and ICE candidates between their WebSocket connections. Media
//! never passes through the relay.
//!
//! # Example
//! ```no_run
//! use signal_relay::{ServerConfig, SignalServer};
//!
//! # async fn example() -> signal_relay::Result<()> {
//! let config = ServerConfig::with_addr("127.0.0.1:8765".parse().unwrap());
//! let server = SignalServer::new(config);
//!
//! server
//!     .run_until(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod protocol;
pub mod registry;
pub mod relay;
pub mod server;
pub mod session;
pub mod stats;

pub use error::{Error, Result};
pub use protocol::{ClientId, ClientRole, InboundMessage, ServerMessage, SessionId};
pub use relay::Relay;
pub use server::{ServerConfig, SignalServer};
