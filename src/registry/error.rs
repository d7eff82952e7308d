//! Registry error types
//!
//! Error types for connection registry operations.

use crate::protocol::ClientId;

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A connection with this id is already registered
    DuplicateClient(ClientId),
    /// No connection with this id is registered
    ClientNotFound(ClientId),
    /// The connection's writer has gone away
    SendFailed(ClientId),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::DuplicateClient(id) => write!(f, "Client already registered: {}", id),
            RegistryError::ClientNotFound(id) => write!(f, "Client not connected: {}", id),
            RegistryError::SendFailed(id) => write!(f, "Connection closed for client: {}", id),
        }
    }
}

impl std::error::Error for RegistryError {}
