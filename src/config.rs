use std::time::Duration;

/// K = the default maximum size of a k-bucket.
pub const DEFAULT_BUCKET_SIZE: usize = 20;
/// Default maximum latency of newly inserted peers.
pub const DEFAULT_MAX_LATENCY: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
/// Routing table configurations
pub struct Config {
    /// K (as in k-bucket) is the maximum number of peers in a bucket.
    ///
    /// Only the last bucket may hold more, until it gets split.
    ///
    /// Defaults to [DEFAULT_BUCKET_SIZE]
    pub bucket_size: usize,
    /// Peers whose latency estimate exceeds this duration are not added to the table.
    ///
    /// Peers already in the table are still refreshed regardless of their latency.
    ///
    /// Defaults to [DEFAULT_MAX_LATENCY]
    pub max_latency: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bucket_size: DEFAULT_BUCKET_SIZE,
            max_latency: DEFAULT_MAX_LATENCY,
        }
    }
}
