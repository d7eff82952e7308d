//! Connection entry types
//!
//! This module defines the per-client state stored in the registry.

use std::net::SocketAddr;
use std::time::Instant;

use tokio::sync::mpsc;

use crate::protocol::{ClientId, ClientRole};

use super::error::RegistryError;

/// Outbound side of a client connection
///
/// Frames pushed here are written to the socket by the connection's writer
/// task. Sending never waits; it only fails once the writer has stopped.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    tx: mpsc::UnboundedSender<String>,
}

impl ConnectionHandle {
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }

    /// Create a handle together with the receiver its writer drains
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Queue a serialized frame for delivery
    pub fn send(&self, id: &ClientId, frame: String) -> Result<(), RegistryError> {
        self.tx
            .send(frame)
            .map_err(|_| RegistryError::SendFailed(id.clone()))
    }
}

/// A registered client connection
#[derive(Debug, Clone)]
pub struct Connection {
    /// Relay-assigned client id
    pub id: ClientId,

    /// Role classified from the first message
    pub role: ClientRole,

    /// Remote peer address
    pub origin: SocketAddr,

    /// Transport handle used for every delivery to this client
    pub handle: ConnectionHandle,

    /// When the client was registered
    pub registered_at: Instant,
}

impl Connection {
    pub fn new(
        id: ClientId,
        role: ClientRole,
        origin: SocketAddr,
        handle: ConnectionHandle,
    ) -> Self {
        Self {
            id,
            role,
            origin,
            handle,
            registered_at: Instant::now(),
        }
    }

    pub fn is_viewer(&self) -> bool {
        self.role == ClientRole::Viewer
    }

    /// Deliver a frame to this client
    pub fn send(&self, frame: String) -> Result<(), RegistryError> {
        self.handle.send(&self.id, frame)
    }
}
