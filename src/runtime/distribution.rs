//! Block distribution of a global index space over execution units

use std::ops::Range;

/// Fixed contiguous block layout of `len` elements over `units` units
///
/// Unit `r` owns `[r * shard_size, min((r + 1) * shard_size, len))` where
/// `shard_size = ceil(len / units)`. When `len` is not a multiple of `units`
/// the trailing units own a shorter shard, possibly an empty one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDistribution {
    len: usize,
    units: usize,
    shard_size: usize,
}

impl BlockDistribution {
    /// Create the layout. `units` must be non-zero.
    pub fn new(len: usize, units: usize) -> Self {
        debug_assert!(units > 0, "distribution over zero units");
        Self {
            len,
            units,
            shard_size: len.div_ceil(units.max(1)),
        }
    }

    /// Total number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the distributed index space is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of units the space is distributed over
    #[inline]
    pub fn units(&self) -> usize {
        self.units
    }

    /// Nominal shard length, `ceil(len / units)`
    #[inline]
    pub fn shard_size(&self) -> usize {
        self.shard_size
    }

    /// Unit owning global index `index`
    #[inline]
    pub fn owner(&self, index: usize) -> usize {
        debug_assert!(index < self.len, "index {index} outside {}", self.len);
        index / self.shard_size
    }

    /// Global index range owned by `rank`
    #[inline]
    pub fn shard(&self, rank: usize) -> Range<usize> {
        let start = (rank * self.shard_size).min(self.len);
        let end = (start + self.shard_size).min(self.len);
        start..end
    }

    /// Indices of `range` owned by `rank`
    #[inline]
    pub fn owned_within(&self, rank: usize, range: Range<usize>) -> Range<usize> {
        let shard = self.shard(rank);
        let start = range.start.max(shard.start);
        let end = range.end.min(shard.end);
        start..end.max(start)
    }
}
