//! XOR distance between a target and a list of peers.

use crate::common::{DhtId, PeerId};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A peer paired with its XOR distance to some target.
pub struct PeerDistance {
    pub peer: PeerId,
    pub distance: DhtId,
}

/// Compute the distance from `target` to every peer, keeping the input order.
pub fn copy_peers_from_list<'a, I>(target: &DhtId, peers: I) -> Result<Vec<PeerDistance>>
where
    I: IntoIterator<Item = &'a PeerId>,
{
    peers
        .into_iter()
        .map(|peer| {
            Ok(PeerDistance {
                peer: peer.clone(),
                distance: target.xor(&peer.dht_id())?,
            })
        })
        .collect()
}

/// Sort `peers` by their XOR distance to `target`, nearest first.
pub fn sort_closest_peers<'a, I>(peers: I, target: &DhtId) -> Result<Vec<PeerId>>
where
    I: IntoIterator<Item = &'a PeerId>,
{
    let mut distances = copy_peers_from_list(target, peers)?;
    sort_by_distance(&mut distances);

    Ok(distances.into_iter().map(|p| p.peer).collect())
}

pub(crate) fn sort_by_distance(distances: &mut [PeerDistance]) {
    // Stable, so equally distant entries keep their bucket order.
    distances.sort_by(|a, b| a.distance.cmp(&b.distance));
}
