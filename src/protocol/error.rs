//! Protocol error types
//!
//! Errors raised while decoding a client frame. All of them are recoverable:
//! the frame is discarded and the connection stays open.

/// Error type for frame decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame is not valid JSON
    InvalidJson(String),
    /// Frame is valid JSON but not an object
    NotAnObject,
    /// A known field has the wrong JSON type
    InvalidField(&'static str),
    /// Binary frame that is not UTF-8
    InvalidUtf8,
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::InvalidJson(reason) => write!(f, "Invalid JSON: {}", reason),
            ProtocolError::NotAnObject => write!(f, "Message is not a JSON object"),
            ProtocolError::InvalidField(field) => write!(f, "Invalid value for field: {}", field),
            ProtocolError::InvalidUtf8 => write!(f, "Binary frame is not valid UTF-8"),
        }
    }
}

impl std::error::Error for ProtocolError {}
