//! Shared relay state and delivery primitives
//!
//! All delivery is a non-blocking push onto a connection's outbound channel,
//! so a routing step runs start to finish while the state is locked.

use std::sync::Arc;

use crate::protocol::{ClientId, InboundMessage, ServerMessage, SessionId};
use crate::registry::ConnectionRegistry;
use crate::session::SessionTable;
use crate::stats::RelayStats;

use super::slot::SenderSlot;

/// The three tables a routing step reads and mutates
pub(crate) struct RelayState {
    pub(crate) registry: ConnectionRegistry,
    pub(crate) slot: SenderSlot,
    pub(crate) sessions: SessionTable,
    pub(crate) stats: Arc<RelayStats>,
}

impl RelayState {
    pub(crate) fn new(stats: Arc<RelayStats>) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            slot: SenderSlot::new(),
            sessions: SessionTable::new(),
            stats,
        }
    }

    /// Forward a client message to one target
    ///
    /// The delivered copy carries `from` and `session_id`. An absent target
    /// or a failed send is logged and counted; nothing is returned to the
    /// originating flow.
    pub(crate) fn forward(
        &self,
        target: &ClientId,
        message: &InboundMessage,
        from: &ClientId,
        session_id: Option<&SessionId>,
        label: &'static str,
    ) {
        let Some(connection) = self.registry.lookup(target) else {
            tracing::warn!(target_id = %target, from = %from, label, "Target not connected");
            self.stats.record_dropped();
            return;
        };

        let frame = match serde_json::to_string(&message.forwarded(from, session_id)) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(error = %e, label, "Failed to encode forwarded message");
                self.stats.record_send_failure();
                return;
            }
        };

        match connection.send(frame) {
            Ok(()) => {
                tracing::info!(
                    from = %from,
                    target_id = %target,
                    session_id = ?session_id.map(SessionId::as_str),
                    "[{}] forwarded",
                    label
                );
                self.stats.record_forwarded();
            }
            Err(e) => {
                tracing::error!(target_id = %target, error = %e, "Failed to forward {}", label);
                self.stats.record_send_failure();
            }
        }
    }

    /// Deliver a relay-originated message to one client
    pub(crate) fn send_server_message(&self, target: &ClientId, message: &ServerMessage) -> bool {
        let frame = match message.to_json() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(error = %e, kind = message.label(), "Failed to encode message");
                return false;
            }
        };

        match self.registry.send_to(target, frame) {
            Ok(()) => {
                tracing::debug!(target_id = %target, kind = message.label(), "Sent");
                true
            }
            Err(e) => {
                tracing::error!(
                    target_id = %target,
                    kind = message.label(),
                    error = %e,
                    "Failed to send"
                );
                self.stats.record_send_failure();
                false
            }
        }
    }

    /// Tell every viewer whether a sender is available
    ///
    /// Best effort: a failed delivery is logged and the loop moves on.
    /// Returns the number of viewers reached.
    pub(crate) fn broadcast_sender_status(&self) -> usize {
        let sender_id = self.slot.current().cloned();
        let status = ServerMessage::SenderStatus {
            available: sender_id.is_some(),
            sender_id,
        };

        let frame = match status.to_json() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode sender status");
                return 0;
            }
        };

        let mut delivered = 0;
        for viewer in self.registry.viewers() {
            match viewer.send(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::error!(
                        client_id = %viewer.id,
                        error = %e,
                        "Failed to send sender status"
                    );
                    self.stats.record_send_failure();
                }
            }
        }

        tracing::debug!(
            available = self.slot.current().is_some(),
            viewers = delivered,
            "Sender status broadcast"
        );
        delivered
    }

    /// Put a sender into the slot and announce it to viewers
    pub(crate) fn claim_sender(&mut self, id: &ClientId) {
        if let Some(previous) = self.slot.claim(id.clone()) {
            if previous != *id {
                tracing::warn!(previous = %previous, sender = %id, "Replacing existing sender");
            }
        }
        self.stats.record_sender_change();
        self.broadcast_sender_status();
    }

    /// Send a relay message to whoever holds the sender slot
    pub(crate) fn notify_sender(&self, message: &ServerMessage) -> bool {
        match self.slot.current() {
            Some(sender) => self.send_server_message(sender, message),
            None => {
                tracing::debug!(kind = message.label(), "No active sender to notify");
                false
            }
        }
    }
}
