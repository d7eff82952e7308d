//! Connection registry
//!
//! Every client that has sent its first message is registered here under a
//! relay-generated id, together with its classified role, origin address and
//! the transport handle used to reach it.
//!
//! ```text
//!   [connection task]                    ConnectionRegistry
//!   socket ──► first frame ──register──► { id ─► Connection {
//!                                              role, origin,
//!   writer task ◄── mpsc ◄───────────────────── handle } }
//! ```
//!
//! Lookups for routing never fail loudly: an unknown target is simply absent.

pub mod entry;
pub mod error;
pub mod store;

pub use entry::{Connection, ConnectionHandle};
pub use error::RegistryError;
pub use store::ConnectionRegistry;
