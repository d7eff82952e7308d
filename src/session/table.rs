//! Session table
//!
//! Maps session ids to the sender/viewer pairing negotiated under them.
//! Sessions are created on first touch through [`SessionTable::upsert`] and
//! live until a client they reference disconnects.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::protocol::{ClientId, SessionId};

/// A negotiation context pairing one sender with a set of viewers
#[derive(Debug, Clone)]
pub struct Session {
    /// Session id
    pub id: SessionId,

    /// Client on the sending side of the session
    pub sender: ClientId,

    /// Viewers negotiated under this session (never contains `sender`)
    viewers: HashSet<ClientId>,

    /// Most recent offer seen for this session
    pub offer: Option<Value>,
}

impl Session {
    pub fn new(id: SessionId, sender: ClientId) -> Self {
        Self {
            id,
            sender,
            viewers: HashSet::new(),
            offer: None,
        }
    }

    /// Add a viewer to the session
    ///
    /// Returns `false` if the viewer was already present or is the session's
    /// own sender, which is never admitted to the viewer set.
    pub fn add_viewer(&mut self, viewer: ClientId) -> bool {
        if viewer == self.sender {
            return false;
        }
        self.viewers.insert(viewer)
    }

    pub fn has_viewer(&self, id: &ClientId) -> bool {
        self.viewers.contains(id)
    }

    pub fn viewers(&self) -> impl Iterator<Item = &ClientId> {
        self.viewers.iter()
    }

    pub fn viewer_count(&self) -> usize {
        self.viewers.len()
    }

    /// Whether the client is this session's sender or one of its viewers
    pub fn involves(&self, id: &ClientId) -> bool {
        self.sender == *id || self.viewers.contains(id)
    }
}

/// Table of active sessions
#[derive(Debug, Default)]
pub struct SessionTable {
    sessions: HashMap<SessionId, Session>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the session with this id, creating it if needed
    ///
    /// `sender` is only used when the session is new; an existing session
    /// keeps the sender it was created with.
    pub fn upsert(&mut self, id: SessionId, sender: &ClientId) -> &mut Session {
        self.sessions.entry(id).or_insert_with_key(|id| {
            tracing::debug!(session_id = %id, sender = %sender, "Session created");
            Session::new(id.clone(), sender.clone())
        })
    }

    pub fn get(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.contains_key(id)
    }

    /// Delete every session that references this client as sender or viewer
    ///
    /// Whole sessions go, including their other members. Returns the ids of
    /// the removed sessions.
    pub fn remove_involving(&mut self, client: &ClientId) -> Vec<SessionId> {
        let doomed: Vec<SessionId> = self
            .sessions
            .values()
            .filter(|session| session.involves(client))
            .map(|session| session.id.clone())
            .collect();

        for id in &doomed {
            self.sessions.remove(id);
        }

        doomed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cid(s: &str) -> ClientId {
        ClientId::new(s)
    }

    fn sid(s: &str) -> SessionId {
        SessionId::new(s)
    }

    #[test]
    fn test_upsert_creates_once() {
        let mut table = SessionTable::new();

        table.upsert(sid("s1"), &cid("S1")).add_viewer(cid("V1"));
        // Second touch with a different default sender keeps the original
        table.upsert(sid("s1"), &cid("S2")).add_viewer(cid("V2"));

        let session = table.get(&sid("s1")).unwrap();
        assert_eq!(session.sender, cid("S1"));
        assert_eq!(session.viewer_count(), 2);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_sender_never_joins_viewer_set() {
        let mut session = Session::new(sid("s1"), cid("S1"));
        assert!(!session.add_viewer(cid("S1")));
        assert!(session.add_viewer(cid("V1")));
        assert!(!session.add_viewer(cid("V1")));
        assert_eq!(session.viewer_count(), 1);
    }

    #[test]
    fn test_remove_involving_drops_whole_sessions() {
        let mut table = SessionTable::new();
        {
            let s1 = table.upsert(sid("s1"), &cid("S1"));
            s1.add_viewer(cid("V1"));
            s1.add_viewer(cid("V2"));
        }
        table.upsert(sid("s2"), &cid("S1")).add_viewer(cid("V3"));
        table.upsert(sid("s3"), &cid("S2")).add_viewer(cid("V3"));

        // V1 leaving removes s1 entirely, V2 included
        let removed = table.remove_involving(&cid("V1"));
        assert_eq!(removed, vec![sid("s1")]);
        assert!(!table.contains(&sid("s1")));

        // Sender removal takes every session it sends on
        let mut removed = table.remove_involving(&cid("S1"));
        removed.sort();
        assert_eq!(removed, vec![sid("s2")]);

        let removed = table.remove_involving(&cid("V3"));
        assert_eq!(removed, vec![sid("s3")]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_remove_involving_unknown_client() {
        let mut table = SessionTable::new();
        table.upsert(sid("s1"), &cid("S1"));
        assert!(table.remove_involving(&cid("nobody")).is_empty());
        assert_eq!(table.len(), 1);
    }
}
