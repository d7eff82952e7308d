//! Disconnect cleanup
//!
//! Runs once per connection whichever way it ended. Every step is
//! unconditional: the registry entry goes, the sender slot is released if
//! this client held it, and every session referencing the client is deleted.
//! Notification failures are logged inside the broadcast and never stop the
//! remaining steps.

use crate::protocol::ClientId;

use super::state::RelayState;

/// What a cleanup pass removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// The client was registered when cleanup ran
    pub was_registered: bool,
    /// The client held the sender slot
    pub released_sender: bool,
    /// Viewers told the sender became unavailable
    pub viewers_notified: usize,
    /// Sessions deleted because they referenced the client
    pub sessions_removed: usize,
}

impl RelayState {
    pub(crate) fn cleanup(&mut self, id: &ClientId) -> CleanupReport {
        let mut report = CleanupReport::default();

        let removed = self.registry.remove(id);
        report.was_registered = removed.is_some();

        if self.slot.release(id) {
            report.released_sender = true;
            report.viewers_notified = self.broadcast_sender_status();
            tracing::info!(client_id = %id, "Sender released");
        }

        let sessions = self.sessions.remove_involving(id);
        report.sessions_removed = sessions.len();
        for session_id in &sessions {
            tracing::debug!(client_id = %id, session_id = %session_id, "Session removed");
        }

        let role = removed
            .as_ref()
            .map(|c| c.role.as_str())
            .unwrap_or("unregistered");
        let connected_for = removed.as_ref().map(|c| c.registered_at.elapsed());
        tracing::info!(
            client_id = %id,
            role,
            connected_for = ?connected_for,
            sessions_removed = report.sessions_removed,
            remaining = self.registry.len(),
            "Cleaned up client"
        );

        report
    }
}
