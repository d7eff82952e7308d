//! Statistics for the signaling relay

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Relay-wide counters
///
/// Atomic counters shared by the relay and its connection tasks.
#[derive(Debug)]
pub struct RelayStats {
    started_at: Instant,
    total_connections: AtomicU64,
    active_connections: AtomicU64,
    messages_received: AtomicU64,
    messages_forwarded: AtomicU64,
    messages_dropped: AtomicU64,
    send_failures: AtomicU64,
    malformed_frames: AtomicU64,
    sender_changes: AtomicU64,
}

impl RelayStats {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            total_connections: AtomicU64::new(0),
            active_connections: AtomicU64::new(0),
            messages_received: AtomicU64::new(0),
            messages_forwarded: AtomicU64::new(0),
            messages_dropped: AtomicU64::new(0),
            send_failures: AtomicU64::new(0),
            malformed_frames: AtomicU64::new(0),
            sender_changes: AtomicU64::new(0),
        }
    }

    pub fn record_connected(&self) {
        self.total_connections.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_disconnected(&self) {
        // Saturates at zero
        let _ = self
            .active_connections
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }

    pub fn record_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_forwarded(&self) {
        self.messages_forwarded.fetch_add(1, Ordering::Relaxed);
    }

    /// A message had nowhere to go
    pub fn record_dropped(&self) {
        self.messages_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_send_failure(&self) {
        self.send_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_malformed(&self) {
        self.malformed_frames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sender_change(&self) {
        self.sender_changes.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> RelayStatsSnapshot {
        RelayStatsSnapshot {
            uptime: self.started_at.elapsed(),
            total_connections: self.total_connections.load(Ordering::Relaxed),
            active_connections: self.active_connections.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            messages_forwarded: self.messages_forwarded.load(Ordering::Relaxed),
            messages_dropped: self.messages_dropped.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
            malformed_frames: self.malformed_frames.load(Ordering::Relaxed),
            sender_changes: self.sender_changes.load(Ordering::Relaxed),
        }
    }
}

impl Default for RelayStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of [`RelayStats`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayStatsSnapshot {
    /// Time since the relay was created
    pub uptime: Duration,
    /// Connections ever registered
    pub total_connections: u64,
    /// Currently registered connections
    pub active_connections: u64,
    /// Well-formed frames received from registered clients
    pub messages_received: u64,
    /// Deliveries to a target (each fan-out target counts once)
    pub messages_forwarded: u64,
    /// Messages with no resolvable target
    pub messages_dropped: u64,
    /// Deliveries that failed at the transport
    pub send_failures: u64,
    /// Frames discarded as undecodable
    pub malformed_frames: u64,
    /// Times the sender slot was claimed
    pub sender_changes: u64,
}
