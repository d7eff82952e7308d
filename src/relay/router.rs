//! Message routing
//!
//! Routing precedence for a message from a registered client:
//!
//! 1. `sdp` present: offer/answer handling
//! 2. `candidate` present: ICE candidate handling
//! 3. `create_new_offer` from a viewer: ask the sender for a fresh offer
//! 4. `viewer_joined` from a viewer: re-announce the viewer to the sender
//!
//! Anything else is ignored.

use serde_json::Value;

use crate::protocol::{ClientId, ClientRole, InboundMessage, SdpKind, ServerMessage, SessionId, Signal};

use super::state::RelayState;

impl RelayState {
    /// Dispatch one inbound message
    pub(crate) fn route(&mut self, from: &ClientId, message: &InboundMessage) {
        let Some(role) = self.registry.role_of(from) else {
            tracing::warn!(client_id = %from, "Unknown client tried to send message");
            return;
        };

        match message.signal() {
            Signal::Sdp(kind) => self.handle_sdp(from, role, kind, message),
            Signal::IceCandidate => self.handle_ice(from, role, message),
            Signal::CreateNewOffer if role == ClientRole::Viewer => self.request_offer(from),
            Signal::ViewerJoined if role == ClientRole::Viewer => self.announce_viewer(from),
            signal => {
                tracing::debug!(client_id = %from, role = %role, ?signal, "Ignoring message");
            }
        }
    }

    fn handle_sdp(
        &mut self,
        from: &ClientId,
        role: ClientRole,
        kind: &SdpKind,
        message: &InboundMessage,
    ) {
        tracing::info!(
            client_id = %from,
            role = %role,
            target_id = ?message.target_id().map(ClientId::as_str),
            "SDP ({}) received",
            kind
        );

        match (kind, role) {
            (SdpKind::Offer, ClientRole::Sender) => {
                let Some(target) = message.target_id() else {
                    tracing::warn!(client_id = %from, "Offer without target_id dropped");
                    self.stats.record_dropped();
                    return;
                };

                let session_id = resolve_session(message);
                let session = self.sessions.upsert(session_id.clone(), from);
                session.add_viewer(target.clone());
                session.offer = Some(Value::Object(message.body().clone()));

                self.forward(target, message, from, Some(&session_id), "OFFER");
            }
            (SdpKind::Answer, ClientRole::Viewer) => {
                let target = message
                    .target_id()
                    .or_else(|| self.slot.current())
                    .cloned();
                let Some(target) = target else {
                    tracing::error!(client_id = %from, "No sender available to forward answer");
                    self.stats.record_dropped();
                    return;
                };

                let session_id = resolve_session(message);
                self.sessions
                    .upsert(session_id.clone(), &target)
                    .add_viewer(from.clone());

                self.forward(&target, message, from, Some(&session_id), "ANSWER");
            }
            _ => {
                tracing::debug!(client_id = %from, role = %role, "Ignoring SDP ({})", kind);
            }
        }
    }

    fn handle_ice(&mut self, from: &ClientId, role: ClientRole, message: &InboundMessage) {
        tracing::info!(client_id = %from, role = %role, "ICE candidate received");

        let session_id = message.session_id();

        if let Some(target) = message.target_id() {
            self.forward(target, message, from, session_id, "ICE");
            return;
        }

        if let Some(session) = session_id.and_then(|id| self.sessions.get(id)) {
            // The recorded sender may be a displaced one; the current sender
            // still fans out to the session's viewers
            let targets: Vec<ClientId> = if role == ClientRole::Sender || session.sender == *from {
                session.viewers().cloned().collect()
            } else {
                vec![session.sender.clone()]
            };

            if targets.is_empty() {
                tracing::debug!(session_id = %session.id, "Session has no viewers for ICE fan-out");
            }
            for target in &targets {
                self.forward(target, message, from, session_id, "ICE");
            }
            return;
        }

        if role == ClientRole::Viewer {
            if let Some(sender) = self.slot.current() {
                self.forward(sender, message, from, session_id, "ICE");
                return;
            }
        }

        tracing::warn!(client_id = %from, "No route for ICE candidate");
        self.stats.record_dropped();
    }

    /// Ask the active sender for a fresh offer on behalf of a viewer
    fn request_offer(&self, viewer: &ClientId) {
        let request = ServerMessage::CreateNewOffer {
            viewer_id: viewer.clone(),
            session_id: SessionId::generate(),
        };
        if self.notify_sender(&request) {
            tracing::info!(client_id = %viewer, "Viewer requested new offer from sender");
        }
    }

    /// Tell the active sender a viewer is waiting for an offer
    pub(crate) fn announce_viewer(&self, viewer: &ClientId) {
        let joined = ServerMessage::ViewerJoined {
            viewer_id: viewer.clone(),
            session_id: SessionId::generate(),
        };
        if self.notify_sender(&joined) {
            tracing::info!(client_id = %viewer, "Notified sender of new viewer");
        }
    }
}

/// Supplied session id, or a fresh one
fn resolve_session(message: &InboundMessage) -> SessionId {
    message
        .session_id()
        .cloned()
        .unwrap_or_else(SessionId::generate)
}
