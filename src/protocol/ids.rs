//! Client and session identifiers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::constants::{ROLE_SENDER, ROLE_UNKNOWN, ROLE_VIEWER};

/// Opaque identifier of a connected client
///
/// Generated by the relay when a connection is accepted; clients only ever
/// echo it back as `target_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a negotiation session between the sender and its viewers
///
/// Either supplied by a client or generated by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random session identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role a client plays in the broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientRole {
    /// The single broadcasting client
    Sender,
    /// A client receiving the sender's broadcast
    Viewer,
    /// Declared a `client_type` the relay does not recognize
    Unknown,
}

impl ClientRole {
    /// Map a declared `client_type` to a role
    pub fn from_client_type(client_type: &str) -> Self {
        match client_type {
            ROLE_SENDER => ClientRole::Sender,
            ROLE_VIEWER => ClientRole::Viewer,
            _ => ClientRole::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientRole::Sender => ROLE_SENDER,
            ClientRole::Viewer => ROLE_VIEWER,
            ClientRole::Unknown => ROLE_UNKNOWN,
        }
    }
}

impl std::fmt::Display for ClientRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = ClientId::generate();
        let b = ClientId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_role_from_client_type() {
        assert_eq!(ClientRole::from_client_type("sender"), ClientRole::Sender);
        assert_eq!(ClientRole::from_client_type("viewer"), ClientRole::Viewer);
        assert_eq!(ClientRole::from_client_type("Sender"), ClientRole::Unknown);
        assert_eq!(ClientRole::from_client_type("recorder"), ClientRole::Unknown);
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let id = ClientId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");

        let session: SessionId = serde_json::from_str("\"s1\"").unwrap();
        assert_eq!(session.as_str(), "s1");
    }
}
