//! Signaling wire constants
//!
//! JSON field names and `type` values exchanged with clients.

/// Role declared by the client in its first message
pub const FIELD_CLIENT_TYPE: &str = "client_type";
/// Message discriminator
pub const FIELD_TYPE: &str = "type";
/// SDP body; its presence marks an SDP message
pub const FIELD_SDP: &str = "sdp";
/// ICE candidate object; its presence marks an ICE message
pub const FIELD_CANDIDATE: &str = "candidate";
/// Explicit delivery target
pub const FIELD_TARGET_ID: &str = "target_id";
/// Negotiation session identifier
pub const FIELD_SESSION_ID: &str = "session_id";
/// Originating client, injected by the relay on every forwarded message
pub const FIELD_FROM: &str = "from";

pub const TYPE_OFFER: &str = "offer";
pub const TYPE_ANSWER: &str = "answer";
pub const TYPE_CREATE_NEW_OFFER: &str = "create_new_offer";
pub const TYPE_VIEWER_JOINED: &str = "viewer_joined";
pub const TYPE_REGISTRATION_SUCCESSFUL: &str = "registration_successful";
pub const TYPE_SENDER_STATUS: &str = "sender_status";

pub const ROLE_SENDER: &str = "sender";
pub const ROLE_VIEWER: &str = "viewer";
pub const ROLE_UNKNOWN: &str = "unknown";
