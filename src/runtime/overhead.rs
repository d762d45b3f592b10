//! Runtime overhead probes
//!
//! Kernel timings include the cost of the owner-computes loop and of the
//! barriers around it. These probes measure both on an empty body so the
//! numbers can be read against the kernel timings.

use super::BlockDistribution;
use super::team::Unit;
use std::hint::black_box;
use std::ops::Range;
use std::time::{Duration, Instant};
use tracing::debug;

/// Number of barrier rounds averaged by [`barrier_overhead`]
pub const BARRIER_ROUNDS: u32 = 1000;

/// Loop and barrier cost seen by one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overhead {
    /// Time for one empty owner-computes loop over the kernel's range
    pub forall: Duration,
    /// Average time for one barrier
    pub barrier: Duration,
}

/// Time an empty owner-computes loop over `range`
///
/// Collective: brackets the loop with barriers so the slowest unit dominates.
pub fn loop_overhead(unit: &Unit<'_>, range: Range<usize>, dist: &BlockDistribution) -> Duration {
    unit.barrier();
    let start = Instant::now();
    unit.forall(range, dist, |i| {
        black_box(i);
    });
    unit.barrier();
    start.elapsed()
}

/// Average cost of one barrier over `rounds` consecutive barriers
pub fn barrier_overhead(unit: &Unit<'_>, rounds: u32) -> Duration {
    unit.barrier();
    let start = Instant::now();
    for _ in 0..rounds {
        unit.barrier();
    }
    start.elapsed() / rounds.max(1)
}

/// Run both probes and log the coordinator's view
pub fn probe(unit: &Unit<'_>, range: Range<usize>, dist: &BlockDistribution) -> Overhead {
    let forall = loop_overhead(unit, range.clone(), dist);
    let barrier = barrier_overhead(unit, BARRIER_ROUNDS);
    if unit.is_coordinator() {
        debug!(
            units = unit.units(),
            indices = range.len(),
            forall_ns = forall.as_nanos() as u64,
            barrier_ns = barrier.as_nanos() as u64,
            "runtime overhead"
        );
    }
    Overhead { forall, barrier }
}
