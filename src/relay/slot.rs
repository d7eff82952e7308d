//! Sender slot
//!
//! Single-slot register holding the id of the active sender. A new sender
//! claiming the slot silently displaces the previous one.

use crate::protocol::ClientId;

#[derive(Debug, Default)]
pub struct SenderSlot {
    current: Option<ClientId>,
}

impl SenderSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Occupy the slot, returning the displaced sender if there was one
    pub fn claim(&mut self, id: ClientId) -> Option<ClientId> {
        self.current.replace(id)
    }

    /// Empty the slot if `id` holds it
    ///
    /// Returns `true` when the slot was actually released.
    pub fn release(&mut self, id: &ClientId) -> bool {
        if self.current.as_ref() == Some(id) {
            self.current = None;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<&ClientId> {
        self.current.as_ref()
    }

    pub fn is_held_by(&self, id: &ClientId) -> bool {
        self.current.as_ref() == Some(id)
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_and_displace() {
        let mut slot = SenderSlot::new();
        assert!(slot.is_empty());

        assert_eq!(slot.claim(ClientId::new("S1")), None);
        assert!(slot.is_held_by(&ClientId::new("S1")));

        let displaced = slot.claim(ClientId::new("S2"));
        assert_eq!(displaced, Some(ClientId::new("S1")));
        assert_eq!(slot.current(), Some(&ClientId::new("S2")));
    }

    #[test]
    fn test_release_only_by_holder() {
        let mut slot = SenderSlot::new();
        slot.claim(ClientId::new("S1"));
        slot.claim(ClientId::new("S2"));

        // Displaced sender cannot release
        assert!(!slot.release(&ClientId::new("S1")));
        assert!(slot.is_held_by(&ClientId::new("S2")));

        assert!(slot.release(&ClientId::new("S2")));
        assert!(slot.is_empty());
        assert!(!slot.release(&ClientId::new("S2")));
    }
}
