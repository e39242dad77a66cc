//! Kademlia routing table with dynamic bucket splitting

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, error, trace};

use crate::common::{copy_peers_from_list, sort_by_distance, DhtId, PeerId};
use crate::config::Config;
use crate::kbucket::Bucket;
use crate::metrics::Metrics;

/// Kademlia routing table, an array of [Bucket]s indexed by common prefix length
/// with the local identifier.
///
/// Bucket `i` holds the peers sharing exactly `i` leading bits with the local
/// identifier, except for the last bucket which holds every peer sharing at least
/// as many. Only the last bucket is ever split, growing the table by one bucket
/// at a time, and buckets are never merged back.
///
/// # Locking
///
/// The bucket array is guarded by a table wide lock. [RoutingTable::update] and
/// [RoutingTable::remove] hold its write lock for their whole duration, so all
/// writers are serialized, including bucket splits. Lookups hold the read lock and
/// read each bucket through the bucket's own lock, one bucket at a time.
pub struct RoutingTable {
    local: DhtId,
    buckets: RwLock<Vec<Bucket>>,
    bucket_size: usize,
    max_latency: Duration,
    metrics: Arc<dyn Metrics>,
}

impl RoutingTable {
    /// Create a new [RoutingTable] around the `local` identifier, with a single empty bucket.
    pub fn new(
        bucket_size: usize,
        local: DhtId,
        max_latency: Duration,
        metrics: Arc<dyn Metrics>,
    ) -> Self {
        RoutingTable {
            local,
            buckets: RwLock::new(vec![Bucket::new()]),
            bucket_size,
            max_latency,
            metrics,
        }
    }

    /// Create a new [RoutingTable] from a [Config].
    pub fn with_config(local: DhtId, config: Config, metrics: Arc<dyn Metrics>) -> Self {
        Self::new(config.bucket_size, local, config.max_latency, metrics)
    }

    // === Getters ===

    /// Returns the [DhtId] of this node, where prefix lengths are measured from.
    pub fn local_id(&self) -> &DhtId {
        &self.local
    }

    pub fn bucket_size(&self) -> usize {
        self.bucket_size
    }

    pub fn max_latency(&self) -> Duration {
        self.max_latency
    }

    // === Public Methods ===

    /// Mark `peer` as seen.
    ///
    /// A peer already in the table is moved to the front of its bucket. A new peer is
    /// added unless its latency exceeds the configured maximum, in which case it is
    /// silently ignored.
    pub fn update(&self, peer: PeerId) {
        let cpl = peer.dht_id().common_prefix_length(&self.local);

        let mut buckets = self.buckets.write();
        let bucket_id = cpl.min(buckets.len() - 1);

        let bucket = &buckets[bucket_id];
        if bucket.has(&peer) {
            bucket.move_to_front(&peer);
            return;
        }

        let latency = self.metrics.latency_ewma(&peer);
        if latency > self.max_latency {
            trace!(%peer, ?latency, "Ignoring peer with high latency");
            return;
        }

        bucket.push_front(peer);

        if bucket.len() > self.bucket_size {
            if bucket_id == buckets.len() - 1 {
                self.next_bucket(&mut buckets);
            } else if let Ok(evicted) = bucket.pop_back() {
                debug!(%evicted, bucket_id, "Evicted least recently seen peer");
            }
        }

        debug_assert!(buckets[..buckets.len() - 1]
            .iter()
            .all(|b| b.len() <= self.bucket_size));
    }

    /// Remove `peer` from the table if it is present.
    ///
    /// Buckets are never merged, even if this empties one.
    pub fn remove(&self, peer: &PeerId) {
        let cpl = peer.dht_id().common_prefix_length(&self.local);

        let buckets = self.buckets.write();
        let bucket_id = cpl.min(buckets.len() - 1);

        buckets[bucket_id].remove(peer);
    }

    /// Returns `peer` if it is in the table.
    pub fn find(&self, peer: &PeerId) -> Option<PeerId> {
        self.nearest_peer(&peer.dht_id())
            .filter(|nearest| nearest == peer)
    }

    /// Returns the single closest peer to `id`, if any.
    pub fn nearest_peer(&self, id: &DhtId) -> Option<PeerId> {
        self.nearest_peers(id, 1).into_iter().next()
    }

    /// Returns at most `count` peers, sorted by their XOR distance to `id`.
    ///
    /// Candidates come from the bucket matching `id`'s common prefix length with
    /// the local identifier. If that bucket has fewer than `count` peers, the
    /// candidates are instead taken from its neighbour, the one above when it
    /// exists, otherwise the one below.
    pub fn nearest_peers(&self, id: &DhtId, count: usize) -> Vec<PeerId> {
        let cpl = id.common_prefix_length(&self.local);

        let buckets = self.buckets.read();
        let cpl = cpl.min(buckets.len() - 1);

        let mut candidates = buckets[cpl].peers();

        if candidates.len() < count {
            if cpl > 0 {
                candidates = buckets[cpl - 1].peers();
            }

            if cpl < buckets.len() - 1 {
                candidates = buckets[cpl + 1].peers();
            }
        }

        drop(buckets);

        let mut distances = match copy_peers_from_list(id, &candidates) {
            Ok(distances) => distances,
            Err(err) => {
                error!(?err, ?id, "Lookup target does not match peer identifiers");
                return Vec::new();
            }
        };

        sort_by_distance(&mut distances);

        distances
            .into_iter()
            .take(count)
            .map(|p| p.peer)
            .collect()
    }

    /// Return the number of peers in this routing table.
    pub fn size(&self) -> usize {
        self.buckets.read().iter().map(|b| b.len()).sum()
    }

    /// Returns `true` if this routing table is empty.
    pub fn is_empty(&self) -> bool {
        self.buckets.read().iter().all(|b| b.is_empty())
    }

    /// Export an owned vector of all peers, bucket by bucket.
    pub fn peers(&self) -> Vec<PeerId> {
        self.buckets
            .read()
            .iter()
            .flat_map(|b| b.peers())
            .collect()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.read().len()
    }

    /// Point in time copy of every bucket's peers, most recently seen first.
    pub fn buckets(&self) -> Vec<Vec<PeerId>> {
        self.buckets.read().iter().map(|b| b.peers()).collect()
    }

    /// Log the content of every bucket at debug level.
    pub fn print(&self) {
        let buckets = self.buckets.read();

        debug!(local = %self.local, buckets = buckets.len(), "Routing table");

        for (i, bucket) in buckets.iter().enumerate() {
            debug!(bucket = i, size = bucket.len(), "Bucket");

            for peer in bucket.peers() {
                let distance = peer.dht_id().xor(&self.local).ok();
                debug!(bucket = i, %peer, ?distance);
            }
        }
    }

    // === Private Methods ===

    /// Split the last bucket until it fits, or until no more splits are possible.
    ///
    /// Returns the peer evicted to restore the bucket size, if any. When every
    /// peer stayed in the former last bucket, its oldest peer is evicted. Once
    /// the bucket count reaches the identifier bit width, the former last
    /// bucket is empty, so the oldest peer of the new deepest bucket is evicted
    /// instead.
    fn next_bucket(&self, buckets: &mut Vec<Bucket>) -> Option<PeerId> {
        loop {
            let last = buckets.len() - 1;

            let new_bucket = buckets[last].split(last, &self.local);
            buckets.push(new_bucket);

            debug!(
                buckets = buckets.len(),
                kept = buckets[last].len(),
                moved = buckets[last + 1].len(),
                "Split last bucket"
            );

            if buckets[last + 1].len() > self.bucket_size {
                if buckets.len() <= self.max_cpl() {
                    continue;
                }

                // Every peer shares the full prefix, splitting further can't help.
                let evicted = buckets[last + 1].pop_back().ok();
                debug!(?evicted, "Evicted from the deepest bucket");

                return evicted;
            }

            if buckets[last].len() > self.bucket_size {
                let evicted = buckets[last].pop_back().ok();
                debug!(?evicted, bucket_id = last, "Evicted after split");

                return evicted;
            }

            return None;
        }
    }

    /// Largest common prefix length with the local identifier, the deepest bucket index.
    fn max_cpl(&self) -> usize {
        self.local.len() * 8
    }
}

impl Debug for RoutingTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingTable")
            .field("local", &self.local)
            .field("bucket_size", &self.bucket_size)
            .field("max_latency", &self.max_latency)
            .field("buckets", &*self.buckets.read())
            .finish()
    }
}
