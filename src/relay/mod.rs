//! Signaling relay
//!
//! The relay owns the connection registry, the sender slot and the session
//! table behind one lock. Each connection task holds an `Arc<Relay>` and
//! calls into it for registration, per-message routing and cleanup.
//!
//! # Architecture
//!
//! ```text
//!                           Arc<Relay>
//!                 ┌─────────────────────────────┐
//!                 │ Mutex<RelayState> {         │
//!                 │   registry: id ─► handle,   │
//!                 │   slot: Option<sender id>,  │
//!                 │   sessions: id ─► Session,  │
//!                 │ }                           │
//!                 └──────────────┬──────────────┘
//!                                │
//!        ┌───────────────────────┼───────────────────────┐
//!        ▼                       ▼                       ▼
//!    [Sender]                [Viewer]                [Viewer]
//!    connect()/route()       route()                 disconnect()
//!        │                       ▲
//!        └── offer ──► forward() ┘  (mpsc push, writer task ──► WebSocket)
//! ```
//!
//! Deliveries never wait, so each call is applied in full before the lock is
//! released. Ordering between different clients is whatever order their
//! tasks acquire the lock.

pub mod cleanup;
mod router;
pub mod slot;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::protocol::{ClientId, ClientRole, InboundMessage, ServerMessage, SessionId};
use crate::registry::{Connection, ConnectionHandle, RegistryError};
use crate::session::Session;
use crate::stats::RelayStats;

pub use cleanup::CleanupReport;
pub use slot::SenderSlot;

use state::RelayState;

/// Sender/viewer signaling relay
pub struct Relay {
    state: Mutex<RelayState>,
    stats: Arc<RelayStats>,
}

impl Relay {
    pub fn new() -> Self {
        let stats = Arc::new(RelayStats::new());
        Self {
            state: Mutex::new(RelayState::new(Arc::clone(&stats))),
            stats,
        }
    }

    pub fn stats(&self) -> &RelayStats {
        &self.stats
    }

    /// Register a client from its first message
    ///
    /// Classifies the role, registers the connection, then either claims the
    /// sender slot (announcing availability to every viewer) or tells the
    /// active sender a viewer joined. The client is acknowledged with
    /// `registration_successful` and the first message is routed like any
    /// other.
    pub async fn connect(
        &self,
        id: ClientId,
        origin: SocketAddr,
        handle: ConnectionHandle,
        first: &InboundMessage,
    ) -> Result<ClientRole, RegistryError> {
        let role = first.classify_role();
        let mut state = self.state.lock().await;

        state
            .registry
            .register(Connection::new(id.clone(), role, origin, handle))?;
        self.stats.record_connected();

        match role {
            ClientRole::Sender => state.claim_sender(&id),
            ClientRole::Viewer => state.announce_viewer(&id),
            ClientRole::Unknown => {
                tracing::warn!(client_id = %id, client_type = ?first.client_type(), "Unrecognized client type");
            }
        }

        state.send_server_message(
            &id,
            &ServerMessage::RegistrationSuccessful {
                client_id: id.clone(),
            },
        );

        self.stats.record_received();
        state.route(&id, first);

        Ok(role)
    }

    /// Route a message from a registered client
    pub async fn route(&self, from: &ClientId, message: &InboundMessage) {
        self.stats.record_received();
        self.state.lock().await.route(from, message);
    }

    /// Remove every trace of a client
    ///
    /// Safe to call for clients that never registered.
    pub async fn disconnect(&self, id: &ClientId) -> CleanupReport {
        let report = self.state.lock().await.cleanup(id);
        if report.was_registered {
            self.stats.record_disconnected();
        }
        report
    }

    /// Current occupant of the sender slot
    pub async fn active_sender(&self) -> Option<ClientId> {
        self.state.lock().await.slot.current().cloned()
    }

    pub async fn connection_count(&self) -> usize {
        self.state.lock().await.registry.len()
    }

    pub async fn role_of(&self, id: &ClientId) -> Option<ClientRole> {
        self.state.lock().await.registry.role_of(id)
    }

    /// Copy of a session, if it exists
    pub async fn session(&self, id: &SessionId) -> Option<Session> {
        self.state.lock().await.sessions.get(id).cloned()
    }

    pub async fn session_count(&self) -> usize {
        self.state.lock().await.sessions.len()
    }
}

impl Default for Relay {
    fn default() -> Self {
        Self::new()
    }
}
