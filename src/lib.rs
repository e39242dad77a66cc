#![doc = include_str!("../README.md")]

mod common;

pub mod config;
mod error;
pub mod kbucket;
pub mod metrics;
mod routing_table;

pub use crate::common::{
    copy_peers_from_list, sort_closest_peers, DhtId, PeerDistance, PeerId, ID_SIZE, MAX_CPL,
};
pub use config::Config;
pub use error::{Error, Result};
pub use kbucket::Bucket;
pub use metrics::{Metrics, PeerMetrics};
pub use routing_table::RoutingTable;
