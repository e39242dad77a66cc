//! Kbuckets
use std::fmt::{self, Debug, Formatter};

use parking_lot::RwLock;

use crate::common::{DhtId, PeerId};
use crate::{Error, Result};

/// An ordered contact list of peers sharing a common prefix length range with
/// the local identifier.
///
/// Peers are kept most recently seen first. Every operation takes the bucket's
/// own lock, so a bucket can be read while the owning table only holds its read lock.
///
/// Capacity is enforced by the [crate::RoutingTable], a bucket accepts any number of pushes.
pub struct Bucket {
    /// Peers in the k-bucket, sorted by the most recently seen.
    peers: RwLock<Vec<PeerId>>,
}

impl Bucket {
    pub fn new() -> Self {
        Bucket {
            peers: RwLock::new(Vec::new()),
        }
    }

    fn from_peers(peers: Vec<PeerId>) -> Self {
        Bucket {
            peers: RwLock::new(peers),
        }
    }

    // === Getters ===

    /// Point in time copy of the peers, most recently seen first.
    pub fn peers(&self) -> Vec<PeerId> {
        self.peers.read().clone()
    }

    pub fn len(&self) -> usize {
        self.peers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.read().is_empty()
    }

    pub fn has(&self, peer: &PeerId) -> bool {
        self.peers.read().contains(peer)
    }

    // === Public Methods ===

    pub fn remove(&self, peer: &PeerId) {
        let mut peers = self.peers.write();

        if let Some(index) = peers.iter().position(|p| p == peer) {
            peers.remove(index);
        }
    }

    /// Move `peer` to the front of the bucket, does nothing if it is absent.
    pub fn move_to_front(&self, peer: &PeerId) {
        let mut peers = self.peers.write();

        if let Some(index) = peers.iter().position(|p| p == peer) {
            let peer = peers.remove(index);
            peers.insert(0, peer);
        }
    }

    /// Insert `peer` as the most recently seen, without checking for duplicates.
    pub fn push_front(&self, peer: PeerId) {
        self.peers.write().insert(0, peer);
    }

    /// Remove and return the least recently seen peer.
    pub fn pop_back(&self) -> Result<PeerId> {
        self.peers.write().pop().ok_or(Error::EmptyBucket)
    }

    /// Move every peer whose common prefix length with `target` is greater than `cpl`
    /// into a new bucket, and return it.
    ///
    /// Both buckets keep the relative order of their peers.
    pub fn split(&self, cpl: usize, target: &DhtId) -> Bucket {
        let mut peers = self.peers.write();

        let (far, near): (Vec<PeerId>, Vec<PeerId>) = peers
            .drain(..)
            .partition(|peer| peer.dht_id().common_prefix_length(target) > cpl);

        *peers = near;

        Bucket::from_peers(far)
    }
}

impl Default for Bucket {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Bucket {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Bucket{{ peers: {} }}", self.len())
    }
}
