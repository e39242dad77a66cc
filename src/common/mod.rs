//! Identifier types and distance helpers shared by the bucket and the table.

mod distance;
mod id;
mod peer;

pub use distance::*;
pub use id::*;
pub use peer::*;
