//! Connection registry implementation
//!
//! Tracks every registered client by id. The registry is a plain map; it is
//! owned by the relay state and only touched while that state is locked.

use std::collections::HashMap;

use crate::protocol::{ClientId, ClientRole};

use super::entry::Connection;
use super::error::RegistryError;

/// Registry of active client connections
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ClientId, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection
    ///
    /// Ids are generated per accepted socket, so a duplicate is a logic error
    /// and is rejected without touching the existing entry.
    pub fn register(&mut self, connection: Connection) -> Result<(), RegistryError> {
        if self.connections.contains_key(&connection.id) {
            return Err(RegistryError::DuplicateClient(connection.id));
        }

        tracing::info!(
            client_id = %connection.id,
            role = %connection.role,
            peer = %connection.origin,
            "Client registered"
        );

        self.connections.insert(connection.id.clone(), connection);
        Ok(())
    }

    /// Look up a connection; absence is not an error
    pub fn lookup(&self, id: &ClientId) -> Option<&Connection> {
        self.connections.get(id)
    }

    /// Remove a connection. Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: &ClientId) -> Option<Connection> {
        self.connections.remove(id)
    }

    /// Role of a registered client
    pub fn role_of(&self, id: &ClientId) -> Option<ClientRole> {
        self.connections.get(id).map(|c| c.role)
    }

    /// Iterate over all connections with the viewer role
    pub fn viewers(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(|c| c.is_viewer())
    }

    /// Deliver a frame to a registered client
    pub fn send_to(&self, id: &ClientId, frame: String) -> Result<(), RegistryError> {
        self.connections
            .get(id)
            .ok_or_else(|| RegistryError::ClientNotFound(id.clone()))?
            .send(frame)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
