//! Main Crate Error

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Kbucket crate error enum.
pub enum Error {
    /// Tried to pop the least recently used peer of a bucket with no peers.
    #[error("Bucket is empty")]
    EmptyBucket,

    /// XOR distance requested between identifiers of different lengths.
    ///
    /// Identifiers derived with [crate::DhtId::from_peer_id] always share the same
    /// length, so this indicates a caller mixing identifier sources.
    #[error("Invalid XOR operands: {left} bytes and {right} bytes")]
    InvalidOperand {
        /// Length of the left hand side identifier.
        left: usize,
        /// Length of the right hand side identifier.
        right: usize,
    },

    /// Identifiers need at least one byte.
    #[error("Invalid Id size, expected at least 1 byte, got {0}")]
    InvalidIdSize(usize),

    /// Failed to parse an identifier from a hex string.
    #[error("Invalid hex encoded Id: {0}")]
    InvalidHex(String),
}

/// Alias for `Result<T, kbucket::Error>`
pub type Result<T, E = Error> = core::result::Result<T, E>;
