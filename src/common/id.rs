//! Kademlia identifier, a coordinate in the XOR metric space
use bytes::Bytes;
use rand::Rng;
use sha1_smol::Sha1;
use std::{
    fmt::{self, Debug, Display, Formatter},
    str::FromStr,
};

use crate::common::PeerId;
use crate::{Error, Result};

/// The size of identifiers derived from a [PeerId], in bytes.
pub const ID_SIZE: usize = 20;
/// The largest possible common prefix length between two derived identifiers.
pub const MAX_CPL: usize = ID_SIZE * 8;

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Kademlia identifier of a peer or a lookup target.
///
/// Ordering is the unsigned big-endian order of the underlying bytes, so the result
/// of [DhtId::xor] can be compared directly as a distance.
pub struct DhtId(Bytes);

impl DhtId {
    /// Derive the identifier of a peer, by hashing its identity bytes.
    pub fn from_peer_id(peer: &PeerId) -> DhtId {
        let digest = Sha1::from(peer.as_bytes()).digest().bytes();

        DhtId(Bytes::copy_from_slice(&digest))
    }

    /// Wrap some bytes as an identifier. Returns Err if `bytes` is empty.
    pub fn from_bytes<T: AsRef<[u8]>>(bytes: T) -> Result<DhtId> {
        let bytes = bytes.as_ref();
        if bytes.is_empty() {
            return Err(Error::InvalidIdSize(0));
        }

        Ok(DhtId(Bytes::copy_from_slice(bytes)))
    }

    pub fn random() -> DhtId {
        let mut rng = rand::thread_rng();
        let random_bytes: [u8; ID_SIZE] = rng.gen();

        DhtId(Bytes::copy_from_slice(&random_bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of leading bits shared by this identifier and `other`.
    ///
    /// Capped at the bit length of the shorter of the two.
    pub fn common_prefix_length(&self, other: &DhtId) -> usize {
        for (i, (a, b)) in self.0.iter().zip(other.0.iter()).enumerate() {
            if a != b {
                // leading equal bytes so far + leading zeros of this byte
                return i * 8 + (a ^ b).leading_zeros() as usize;
            }
        }

        self.len().min(other.len()) * 8
    }

    /// Byte-wise XOR of two identifiers of the same length.
    pub fn xor(&self, other: &DhtId) -> Result<DhtId> {
        if self.len() != other.len() {
            return Err(Error::InvalidOperand {
                left: self.len(),
                right: other.len(),
            });
        }

        let xor: Vec<u8> = self
            .0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a ^ b)
            .collect();

        Ok(DhtId(xor.into()))
    }
}

impl From<&PeerId> for DhtId {
    fn from(peer: &PeerId) -> Self {
        DhtId::from_peer_id(peer)
    }
}

impl Display for DhtId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }

        Ok(())
    }
}

impl Debug for DhtId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "DhtId({})", self)
    }
}

impl FromStr for DhtId {
    type Err = Error;

    fn from_str(s: &str) -> Result<DhtId> {
        if s.len() % 2 != 0 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidHex(s.to_string()));
        }

        let bytes = (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16))
            .collect::<core::result::Result<Vec<u8>, _>>()
            .map_err(|_| Error::InvalidHex(s.to_string()))?;

        DhtId::from_bytes(bytes)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn common_prefix_length() {
        let a = DhtId::from_str("ff00").unwrap();

        assert_eq!(a.common_prefix_length(&a), 16);
        assert_eq!(a.common_prefix_length(&DhtId::from_str("7f00").unwrap()), 0);
        assert_eq!(a.common_prefix_length(&DhtId::from_str("fe00").unwrap()), 7);
        assert_eq!(a.common_prefix_length(&DhtId::from_str("ff80").unwrap()), 8);
        assert_eq!(a.common_prefix_length(&DhtId::from_str("ff01").unwrap()), 15);
    }

    #[test]
    fn common_prefix_length_is_capped_by_shorter() {
        let long = DhtId::from_str("ff00ff").unwrap();
        let short = DhtId::from_str("ff").unwrap();

        assert_eq!(long.common_prefix_length(&short), 8);
        assert_eq!(short.common_prefix_length(&long), 8);
    }

    #[test]
    fn xor() {
        let a = DhtId::from_str("f0f0").unwrap();
        let b = DhtId::from_str("0ff1").unwrap();

        assert_eq!(a.xor(&b).unwrap(), DhtId::from_str("ff01").unwrap());
        assert_eq!(a.xor(&a).unwrap(), DhtId::from_str("0000").unwrap());
    }

    #[test]
    fn xor_mismatched_lengths() {
        let a = DhtId::from_str("f0f0").unwrap();
        let b = DhtId::from_str("f0").unwrap();

        assert_eq!(
            a.xor(&b),
            Err(Error::InvalidOperand { left: 2, right: 1 })
        );
    }

    #[test]
    fn distance_ordering() {
        let target = DhtId::from_str("8000").unwrap();

        let near = DhtId::from_str("8001").unwrap().xor(&target).unwrap();
        let far = DhtId::from_str("0000").unwrap().xor(&target).unwrap();

        assert!(near < far);
    }

    #[test]
    fn from_peer_id() {
        let peer = PeerId::new("Random Local Peer");

        let id = DhtId::from_peer_id(&peer);

        assert_eq!(id.len(), ID_SIZE);
        assert_eq!(id, DhtId::from(&peer));
        assert_ne!(id, DhtId::from_peer_id(&PeerId::new("Random Peer 0")));
    }

    #[test]
    fn hex_round_trip() {
        let id = DhtId::from_str("5a3ce9c14e7a08645677bbd1cfe7d8f956d53256").unwrap();

        assert_eq!(id.to_string(), "5a3ce9c14e7a08645677bbd1cfe7d8f956d53256");
        assert!(DhtId::from_str("abc").is_err());
        assert!(DhtId::from_str("zz").is_err());
        assert!(DhtId::from_str("+f+f").is_err());
        assert!(DhtId::from_str("-1ff").is_err());
        assert_eq!(DhtId::from_str(""), Err(Error::InvalidIdSize(0)));
    }
}
