//! Signaling protocol
//!
//! One JSON object per WebSocket frame. Clients send SDP offers/answers, ICE
//! candidates and a couple of control requests; the relay forwards them with
//! `from` and `session_id` injected, and originates a small set of
//! [`ServerMessage`]s of its own.

pub mod constants;
pub mod error;
pub mod ids;
pub mod message;

pub use error::ProtocolError;
pub use ids::{ClientId, ClientRole, SessionId};
pub use message::{InboundMessage, SdpKind, ServerMessage, Signal};
