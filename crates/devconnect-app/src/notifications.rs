//! Unread-notification state.
//!
//! [`NotificationStore`] is the authoritative, process-wide mapping from peer
//! to unread-message count. It is pure state: push routing and view
//! acknowledgments mutate it through the operations here, everything else
//! reads.
//!
//! A peer with nothing unread is absent from the map, never present with a
//! zero count. Counts move in one direction between acknowledgments: inbound
//! pushes increment, opening the conversation removes the key.

use std::collections::HashMap;

use devconnect_proto::UserId;

/// Per-peer unread counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationStore {
    counts: HashMap<UserId, u32>,
}

impl NotificationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one unread message from `peer`.
    pub fn increment(&mut self, peer: UserId) {
        *self.counts.entry(peer).or_insert(0) += 1;
    }

    /// Acknowledge `peer`: everything from them is now read.
    pub fn clear(&mut self, peer: &UserId) {
        self.counts.remove(peer);
    }

    /// Drop all unread state (logout).
    pub fn clear_all(&mut self) {
        self.counts.clear();
    }

    /// Merge a server-persisted snapshot, snapshot values winning per key.
    ///
    /// Keys absent from the snapshot keep their current counts. Zero-valued
    /// snapshot entries remove the key instead of inserting it, preserving
    /// the absence invariant.
    pub fn hydrate(&mut self, snapshot: HashMap<UserId, u32>) {
        for (peer, count) in snapshot {
            if count == 0 {
                self.counts.remove(&peer);
            } else {
                self.counts.insert(peer, count);
            }
        }
    }

    /// Unread count for `peer`. Absent reads as zero.
    pub fn count(&self, peer: &UserId) -> u32 {
        self.counts.get(peer).copied().unwrap_or(0)
    }

    /// All peers with unread messages.
    pub fn counts(&self) -> &HashMap<UserId, u32> {
        &self.counts
    }
}
