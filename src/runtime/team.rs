//! Execution units and collective operations
//!
//! A [`Team`] owns a fixed pool of P threads. [`Team::run`] launches the same
//! closure once on every thread (single program, multiple data); each copy
//! receives its own [`Unit`] and can only diverge from the others through
//! rank comparisons such as [`Unit::is_coordinator`].
//!
//! Collective operations (barrier, broadcast, allocation, free) must be called
//! by every unit in the same order. A unit that skips one deadlocks the rest;
//! this is a programming error and is not detected.

use super::BlockDistribution;
use super::array::{PartialResult, PartitionedArray};
use crate::dtype::Element;
use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::any::Any;
use std::ops::Range;
use std::sync::Barrier;

/// Rank of the unit that performs serial post-barrier work
pub const COORDINATOR: usize = 0;

/// A fixed group of execution units
pub struct Team {
    units: usize,
    pool: rayon::ThreadPool,
    barrier: Barrier,
    exchange: Mutex<Option<Box<dyn Any + Send>>>,
}

impl Team {
    /// Bring up `units` execution units
    pub fn new(units: usize) -> Result<Self> {
        if units == 0 {
            return Err(Error::invalid_argument(
                "units",
                "at least one execution unit is required",
            ));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(units)
            .thread_name(|rank| format!("unit-{rank}"))
            .build()
            .map_err(|e| Error::Runtime(format!("failed to start {units} units: {e}")))?;

        Ok(Self {
            units,
            pool,
            barrier: Barrier::new(units),
            exchange: Mutex::new(None),
        })
    }

    /// Number of execution units (P)
    #[inline]
    pub fn units(&self) -> usize {
        self.units
    }

    /// Run `body` once on every unit and collect the results in rank order
    ///
    /// A panic on any unit is re-raised on the caller once all units return.
    pub fn run<F, R>(&self, body: F) -> Vec<R>
    where
        F: Fn(&Unit<'_>) -> R + Sync,
        R: Send,
    {
        self.pool.broadcast(|ctx| {
            let unit = Unit {
                rank: ctx.index(),
                team: self,
            };
            body(&unit)
        })
    }
}

impl Team {
    /// Run `op` inside the team's thread pool
    ///
    /// Not SPMD: `op` runs once, and any rayon parallel iterators it uses are
    /// spread over the team's P threads.
    pub fn install<F, R>(&self, op: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}

impl std::fmt::Debug for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Team").field("units", &self.units).finish()
    }
}

/// One execution unit's view of its team
#[derive(Clone, Copy)]
pub struct Unit<'t> {
    rank: usize,
    team: &'t Team,
}

impl<'t> Unit<'t> {
    /// This unit's identity, `0..P`
    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Number of units in the team
    #[inline]
    pub fn units(&self) -> usize {
        self.team.units
    }

    /// True on the single unit that performs serial coordinator work
    #[inline]
    pub fn is_coordinator(&self) -> bool {
        self.rank == COORDINATOR
    }

    /// Block until every unit of the team has called `barrier`
    ///
    /// No timeout. Stores issued before the barrier are visible to every unit
    /// after it.
    #[inline]
    pub fn barrier(&self) {
        self.team.barrier.wait();
    }

    /// Owner-computes loop
    ///
    /// Calls `body(i)` exactly once for every `i` in `range` that `dist`
    /// assigns to this unit. Indices owned by other units are skipped. There is
    /// no ordering guarantee between units and no implicit barrier.
    #[inline]
    pub fn forall<F>(&self, range: Range<usize>, dist: &BlockDistribution, mut body: F)
    where
        F: FnMut(usize),
    {
        for i in dist.owned_within(self.rank, range) {
            body(i);
        }
    }

    /// Share a value produced by the coordinator with every unit
    ///
    /// Implies a barrier before the coordinator evaluates `produce`, so any
    /// stores made before the call are visible to it.
    pub fn broadcast<T, F>(&self, produce: F) -> Result<T>
    where
        T: Clone + Send + 'static,
        F: FnOnce() -> T,
    {
        // All readers of the previous exchange are done once everyone arrives.
        self.barrier();
        if self.is_coordinator() {
            *self.team.exchange.lock() = Some(Box::new(produce()));
        }
        self.barrier();

        let slot = self.team.exchange.lock();
        slot.as_ref()
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
            .ok_or_else(|| {
                Error::Runtime("collective broadcast observed a mismatched value".to_string())
            })
    }

    /// Collectively allocate a zeroed array of `len` elements
    ///
    /// The coordinator performs the allocation and every unit receives a handle
    /// to the same storage. On failure every unit receives
    /// [`Error::OutOfMemory`]; the contents of the array are then undefined and
    /// the caller must abandon the run.
    pub fn all_alloc<T: Element>(&self, len: usize) -> Result<PartitionedArray<T>> {
        let units = self.units();
        let bytes = len.saturating_mul(std::mem::size_of::<T::Cell>());
        let shared = self.broadcast(|| PartitionedArray::<T>::allocate(len, units))?;
        shared.ok_or(Error::OutOfMemory { size: bytes })
    }

    /// Collectively allocate one partial-result slot per unit
    pub fn all_alloc_partials<T: Element>(&self) -> Result<PartialResult<T>> {
        self.all_alloc::<T>(self.units()).map(PartialResult::new)
    }

    /// Collectively release an array
    ///
    /// Every unit must call this after its last access; the coordinator clears
    /// the exchange slot once all units have arrived.
    pub fn all_free<T: Element>(&self, array: PartitionedArray<T>) {
        self.barrier();
        if self.is_coordinator() {
            self.team.exchange.lock().take();
        }
        drop(array);
    }
}

impl std::fmt::Debug for Unit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unit")
            .field("rank", &self.rank)
            .field("units", &self.team.units)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_zero_units_rejected() {
        assert!(matches!(
            Team::new(0),
            Err(Error::InvalidArgument { arg: "units", .. })
        ));
    }

    #[test]
    fn test_run_returns_in_rank_order() {
        let team = Team::new(4).unwrap();
        let ranks = team.run(|unit| (unit.rank(), unit.units()));
        assert_eq!(ranks, vec![(0, 4), (1, 4), (2, 4), (3, 4)]);
    }

    #[test]
    fn test_barrier_holds_back_early_units() {
        let team = Team::new(4).unwrap();
        let arrived = AtomicUsize::new(0);

        let seen = team.run(|unit| {
            if unit.rank() == 2 {
                std::thread::sleep(Duration::from_millis(50));
            }
            arrived.fetch_add(1, Ordering::SeqCst);
            unit.barrier();
            arrived.load(Ordering::SeqCst)
        });

        assert!(seen.iter().all(|&n| n == 4), "observed {seen:?}");
    }

    #[test]
    fn test_install_uses_team_pool() {
        let team = Team::new(3).unwrap();
        assert_eq!(team.install(rayon::current_num_threads), 3);
    }

    #[test]
    fn test_broadcast_from_coordinator() {
        let team = Team::new(3).unwrap();
        let values = team.run(|unit| unit.broadcast(|| 42u64).unwrap());
        assert_eq!(values, vec![42, 42, 42]);
    }

    #[test]
    fn test_repeated_broadcasts_do_not_mix() {
        let team = Team::new(4).unwrap();
        let sums = team.run(|unit| {
            (0..20u32)
                .map(|round| unit.broadcast(|| round).unwrap())
                .sum::<u32>()
        });
        assert!(sums.iter().all(|&s| s == (0..20).sum::<u32>()));
    }

    #[test]
    fn test_all_alloc_failure_reaches_every_unit() {
        let team = Team::new(2).unwrap();
        let results = team.run(|unit| unit.all_alloc::<f64>(usize::MAX).map(|_| ()));
        for r in results {
            assert!(matches!(r, Err(Error::OutOfMemory { .. })));
        }
    }
}
