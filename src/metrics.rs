//! Latency source consulted before inserting new peers.

use std::fmt::Debug;
use std::time::Duration;

use dashmap::DashMap;

use crate::common::PeerId;

/// Smoothing factor applied to every new latency sample.
pub const LATENCY_EWMA_SMOOTHING: f64 = 0.1;

/// Source of per peer latency, as an exponentially weighted moving average.
pub trait Metrics: Debug + Send + Sync {
    /// Returns the current latency estimate of `peer`.
    ///
    /// What to return for peers that were never measured is up to the implementation,
    /// the [crate::RoutingTable] only compares it with its configured maximum.
    fn latency_ewma(&self, peer: &PeerId) -> Duration;
}

#[derive(Debug, Default)]
/// Default implementation of [Metrics], fed by the network layer.
///
/// Peers that were never measured report [Duration::ZERO].
pub struct PeerMetrics {
    latencies: DashMap<PeerId, Duration>,
}

impl PeerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a new round trip sample into the peer's moving average.
    ///
    /// The first sample of a peer is taken as is.
    pub fn record_latency(&self, peer: &PeerId, sample: Duration) {
        self.latencies
            .entry(peer.clone())
            .and_modify(|ewma| {
                let next = (1.0 - LATENCY_EWMA_SMOOTHING) * ewma.as_secs_f64()
                    + LATENCY_EWMA_SMOOTHING * sample.as_secs_f64();

                *ewma = Duration::from_secs_f64(next);
            })
            .or_insert(sample);
    }

    /// Forget everything measured about `peer`.
    pub fn remove(&self, peer: &PeerId) {
        self.latencies.remove(peer);
    }
}

impl Metrics for PeerMetrics {
    fn latency_ewma(&self, peer: &PeerId) -> Duration {
        self.latencies
            .get(peer)
            .map(|ewma| *ewma)
            .unwrap_or(Duration::ZERO)
    }
}
