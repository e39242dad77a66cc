//! Opaque peer identity, the key stored in the routing table
use bytes::Bytes;
use rand::Rng;
use std::fmt::{self, Debug, Display, Formatter};

use crate::common::DhtId;

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Peer identity as provided by the transport layer, compared by value.
pub struct PeerId(Bytes);

impl PeerId {
    pub fn new(bytes: impl Into<Bytes>) -> PeerId {
        PeerId(bytes.into())
    }

    pub fn random() -> PeerId {
        let mut rng = rand::thread_rng();
        let random_bytes: [u8; 32] = rng.gen();

        PeerId(Bytes::copy_from_slice(&random_bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the identifier of this peer in the XOR metric space.
    pub fn dht_id(&self) -> DhtId {
        DhtId::from_peer_id(self)
    }
}

impl Display for PeerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }

        Ok(())
    }
}

impl Debug for PeerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({})", self)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn equality_by_value() {
        let a = PeerId::new("Random Peer 1");
        let b = PeerId::new(String::from("Random Peer 1"));

        assert_eq!(a, b);
        assert_eq!(a.dht_id(), b.dht_id());
        assert_ne!(a, PeerId::new("Random Peer 2"));
    }

    #[test]
    fn display() {
        assert_eq!(PeerId::new(&b"\x01\xab"[..]).to_string(), "01ab");
    }
}
