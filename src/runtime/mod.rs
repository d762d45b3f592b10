//! Partitioned array runtime
//!
//! The runtime models a partitioned-memory machine on one process: P execution
//! units share a single global index space, every array is split into fixed
//! contiguous shards (one per unit), and work follows data ownership.
//!
//! - [`Team`] / [`Unit`]: SPMD launch, rank identity, collective barrier and
//!   coordinator broadcast.
//! - [`BlockDistribution`]: `shard_size = ceil(N / P)`, `owner(i) = i / shard_size`.
//! - [`PartitionedArray`]: collectively allocated shared array.
//! - [`PartialResult`]: one reduction slot per unit.
//! - [`overhead`]: empty-loop and barrier cost probes.

mod array;
mod distribution;
pub mod overhead;
mod team;

pub use array::{PartialResult, PartitionedArray};
pub use distribution::BlockDistribution;
pub use team::{COORDINATOR, Team, Unit};
