//! Signaling message types
//!
//! Inbound frames are loosely shaped JSON objects. They are decoded once into
//! an [`InboundMessage`]: a [`Signal`] discriminant plus the few routing
//! fields the relay reads. The original object is kept so that forwarded
//! messages reach their target with every client field intact.
//!
//! Discrimination follows field presence first, then `type`:
//!
//! | Present         | `type`             | Signal                  |
//! |-----------------|--------------------|-------------------------|
//! | `sdp`           | any                | `Sdp(kind)`             |
//! | `candidate`     | any                | `IceCandidate`          |
//! |                 | `create_new_offer` | `CreateNewOffer`        |
//! |                 | `viewer_joined`    | `ViewerJoined`          |
//! |                 | anything else      | `Unrecognized`          |

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::constants::*;
use super::error::ProtocolError;
use super::ids::{ClientId, ClientRole, SessionId};

/// Kind of SDP payload, taken from the `type` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdpKind {
    Offer,
    Answer,
    /// Any other (or missing) `type` alongside an `sdp` body
    Other(Option<String>),
}

impl SdpKind {
    fn from_type(msg_type: Option<&str>) -> Self {
        match msg_type {
            Some(TYPE_OFFER) => SdpKind::Offer,
            Some(TYPE_ANSWER) => SdpKind::Answer,
            other => SdpKind::Other(other.map(str::to_owned)),
        }
    }
}

impl std::fmt::Display for SdpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SdpKind::Offer => f.write_str(TYPE_OFFER),
            SdpKind::Answer => f.write_str(TYPE_ANSWER),
            SdpKind::Other(Some(t)) => f.write_str(t),
            SdpKind::Other(None) => f.write_str("untyped"),
        }
    }
}

/// Routing-relevant shape of an inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// SDP offer or answer
    Sdp(SdpKind),
    /// ICE candidate
    IceCandidate,
    /// Viewer asks the sender for a fresh offer
    CreateNewOffer,
    /// Viewer re-announces itself to the sender
    ViewerJoined,
    /// Nothing the relay routes (registration-only frames included)
    Unrecognized,
}

/// A decoded client frame
#[derive(Debug, Clone)]
pub struct InboundMessage {
    signal: Signal,
    client_type: Option<String>,
    target_id: Option<ClientId>,
    session_id: Option<SessionId>,
    body: Map<String, Value>,
}

impl InboundMessage {
    /// Decode a text frame
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ProtocolError::InvalidJson(e.to_string()))?;
        Self::from_value(value)
    }

    /// Decode an already-parsed JSON value
    pub fn from_value(value: Value) -> Result<Self, ProtocolError> {
        let Value::Object(body) = value else {
            return Err(ProtocolError::NotAnObject);
        };

        let msg_type = optional_str(&body, FIELD_TYPE)?;
        let client_type = optional_str(&body, FIELD_CLIENT_TYPE)?;
        let target_id = optional_str(&body, FIELD_TARGET_ID)?.map(ClientId::new);
        let session_id = optional_str(&body, FIELD_SESSION_ID)?.map(SessionId::new);

        let signal = if body.contains_key(FIELD_SDP) {
            Signal::Sdp(SdpKind::from_type(msg_type.as_deref()))
        } else if body.contains_key(FIELD_CANDIDATE) {
            Signal::IceCandidate
        } else {
            match msg_type.as_deref() {
                Some(TYPE_CREATE_NEW_OFFER) => Signal::CreateNewOffer,
                Some(TYPE_VIEWER_JOINED) => Signal::ViewerJoined,
                _ => Signal::Unrecognized,
            }
        };

        Ok(Self {
            signal,
            client_type,
            target_id,
            session_id,
            body,
        })
    }

    pub fn signal(&self) -> &Signal {
        &self.signal
    }

    /// Explicit `client_type`, if the client declared one
    pub fn client_type(&self) -> Option<&str> {
        self.client_type.as_deref()
    }

    pub fn target_id(&self) -> Option<&ClientId> {
        self.target_id.as_ref()
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// The original JSON object
    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Classify the role of a client from its first message
    ///
    /// An explicit `client_type` wins. Otherwise an SDP offer marks a sender
    /// and anything else a viewer.
    pub fn classify_role(&self) -> ClientRole {
        if let Some(client_type) = self.client_type() {
            return ClientRole::from_client_type(client_type);
        }
        match self.signal {
            Signal::Sdp(SdpKind::Offer) => ClientRole::Sender,
            _ => ClientRole::Viewer,
        }
    }

    /// Copy of the original object annotated for delivery
    ///
    /// `from` and `session_id` are always overwritten; a missing session is
    /// sent as `null`.
    pub fn forwarded(&self, from: &ClientId, session_id: Option<&SessionId>) -> Value {
        let mut body = self.body.clone();
        body.insert(FIELD_FROM.to_owned(), Value::String(from.as_str().to_owned()));
        body.insert(
            FIELD_SESSION_ID.to_owned(),
            session_id
                .map(|id| Value::String(id.as_str().to_owned()))
                .unwrap_or(Value::Null),
        );
        Value::Object(body)
    }
}

fn optional_str(
    body: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ProtocolError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ProtocolError::InvalidField(field)),
    }
}

/// Messages originated by the relay itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once to a client after it has been registered
    RegistrationSuccessful { client_id: ClientId },
    /// Broadcast to every viewer when the sender slot changes
    SenderStatus {
        available: bool,
        sender_id: Option<ClientId>,
    },
    /// Tells the sender a viewer is waiting for an offer
    ViewerJoined {
        viewer_id: ClientId,
        session_id: SessionId,
    },
    /// Asks the sender to renegotiate with a viewer
    CreateNewOffer {
        viewer_id: ClientId,
        session_id: SessionId,
    },
}

impl ServerMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            ServerMessage::RegistrationSuccessful { .. } => TYPE_REGISTRATION_SUCCESSFUL,
            ServerMessage::SenderStatus { .. } => TYPE_SENDER_STATUS,
            ServerMessage::ViewerJoined { .. } => TYPE_VIEWER_JOINED,
            ServerMessage::CreateNewOffer { .. } => TYPE_CREATE_NEW_OFFER,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_sdp_presence_wins_over_type() {
        let msg = InboundMessage::parse(
            r#"{"sdp":"v=0","candidate":{},"type":"viewer_joined"}"#,
        )
        .unwrap();
        assert_eq!(
            msg.signal(),
            &Signal::Sdp(SdpKind::Other(Some("viewer_joined".into())))
        );
    }

    #[test]
    fn test_candidate_and_typed_messages() {
        let ice = InboundMessage::parse(r#"{"candidate":{"candidate":"a=1"}}"#).unwrap();
        assert_eq!(ice.signal(), &Signal::IceCandidate);

        let renegotiate = InboundMessage::parse(r#"{"type":"create_new_offer"}"#).unwrap();
        assert_eq!(renegotiate.signal(), &Signal::CreateNewOffer);

        let joined = InboundMessage::parse(r#"{"type":"viewer_joined"}"#).unwrap();
        assert_eq!(joined.signal(), &Signal::ViewerJoined);

        let other = InboundMessage::parse(r#"{"type":"hello"}"#).unwrap();
        assert_eq!(other.signal(), &Signal::Unrecognized);
    }

    #[test]
    fn test_routing_fields() {
        let msg = InboundMessage::parse(
            r#"{"sdp":"v=0","type":"answer","target_id":"S1","session_id":"s1"}"#,
        )
        .unwrap();
        assert_eq!(msg.signal(), &Signal::Sdp(SdpKind::Answer));
        assert_eq!(msg.target_id(), Some(&ClientId::new("S1")));
        assert_eq!(msg.session_id(), Some(&SessionId::new("s1")));
        assert!(msg.client_type().is_none());
    }

    #[test]
    fn test_null_fields_are_absent() {
        let msg = InboundMessage::parse(r#"{"candidate":{},"target_id":null}"#).unwrap();
        assert!(msg.target_id().is_none());
    }

    #[test]
    fn test_malformed_frames() {
        assert!(matches!(
            InboundMessage::parse("{not json"),
            Err(ProtocolError::InvalidJson(_))
        ));
        assert_eq!(
            InboundMessage::parse("[1,2]").unwrap_err(),
            ProtocolError::NotAnObject
        );
        assert_eq!(
            InboundMessage::parse(r#"{"target_id":42}"#).unwrap_err(),
            ProtocolError::InvalidField("target_id")
        );
    }

    #[test]
    fn test_classify_role() {
        let declared = InboundMessage::parse(r#"{"client_type":"viewer","sdp":"x","type":"offer"}"#)
            .unwrap();
        assert_eq!(declared.classify_role(), ClientRole::Viewer);

        let offer = InboundMessage::parse(r#"{"sdp":"x","type":"offer"}"#).unwrap();
        assert_eq!(offer.classify_role(), ClientRole::Sender);

        let answer = InboundMessage::parse(r#"{"sdp":"x","type":"answer"}"#).unwrap();
        assert_eq!(answer.classify_role(), ClientRole::Viewer);

        let odd = InboundMessage::parse(r#"{"client_type":"recorder"}"#).unwrap();
        assert_eq!(odd.classify_role(), ClientRole::Unknown);
    }

    #[test]
    fn test_forwarded_annotation() {
        let msg = InboundMessage::parse(
            r#"{"sdp":"v=0","type":"offer","target_id":"V1","from":"spoofed"}"#,
        )
        .unwrap();

        let out = msg.forwarded(&ClientId::new("S1"), Some(&SessionId::new("s1")));
        assert_eq!(
            out,
            json!({
                "sdp": "v=0",
                "type": "offer",
                "target_id": "V1",
                "from": "S1",
                "session_id": "s1"
            })
        );

        let ice = InboundMessage::parse(r#"{"candidate":{}}"#).unwrap();
        let out = ice.forwarded(&ClientId::new("V1"), None);
        assert_eq!(out["session_id"], Value::Null);
    }

    #[test]
    fn test_server_message_encoding() {
        let status = ServerMessage::SenderStatus {
            available: false,
            sender_id: None,
        };
        let value: Value = serde_json::from_str(&status.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"type": "sender_status", "available": false, "sender_id": null})
        );

        let ack = ServerMessage::RegistrationSuccessful {
            client_id: ClientId::new("abc"),
        };
        let value: Value = serde_json::from_str(&ack.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"type": "registration_successful", "client_id": "abc"})
        );
    }
}
