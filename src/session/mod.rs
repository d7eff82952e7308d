//! Negotiation sessions
//!
//! A session has no state machine beyond existence: it appears the first
//! time an offer, answer or candidate names it and disappears when any
//! client it references disconnects.

pub mod table;

pub use table::{Session, SessionTable};
