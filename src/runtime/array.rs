//! Partitioned shared arrays

use super::BlockDistribution;
use super::team::Unit;
use crate::dtype::Element;
use std::sync::Arc;

/// An array of `len` elements shared by every unit and block-distributed
/// over them
///
/// Any unit may read any index. Inside an owner-computes loop a unit writes
/// only the indices it owns; serial phases (seeding, coordinator reductions)
/// may write anywhere as long as a barrier separates them from the readers.
///
/// Handles are cheap to clone; the storage is released when the last handle
/// is dropped, normally through [`Unit::all_free`].
#[derive(Clone)]
pub struct PartitionedArray<T: Element> {
    inner: Arc<Storage<T>>,
}

struct Storage<T: Element> {
    cells: Box<[T::Cell]>,
    dist: BlockDistribution,
}

impl<T: Element> PartitionedArray<T> {
    /// Allocate zeroed storage, or `None` if the allocator refuses
    pub(crate) fn allocate(len: usize, units: usize) -> Option<Self> {
        let cells = bytemuck::allocation::try_zeroed_slice_box::<T::Cell>(len).ok()?;
        Some(Self {
            inner: Arc::new(Storage {
                cells,
                dist: BlockDistribution::new(len, units),
            }),
        })
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.cells.len()
    }

    /// Returns true if the array has no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.cells.is_empty()
    }

    /// Layout of the array over the team
    #[inline]
    pub fn distribution(&self) -> &BlockDistribution {
        &self.inner.dist
    }

    /// Read element `index`
    #[inline]
    pub fn get(&self, index: usize) -> T {
        T::load(&self.inner.cells[index])
    }

    /// Write element `index`
    #[inline]
    pub fn set(&self, index: usize, value: T) {
        T::store(&self.inner.cells[index], value)
    }

    /// True if `unit` owns `index`
    #[inline]
    pub fn is_owned_by(&self, unit: &Unit<'_>, index: usize) -> bool {
        self.inner.dist.owner(index) == unit.rank()
    }

    /// Serially write every element from `f(index)`
    ///
    /// Meant for a single seeding unit; follow it with a barrier.
    pub fn fill_with<F>(&self, mut f: F)
    where
        F: FnMut(usize) -> T,
    {
        for (i, cell) in self.inner.cells.iter().enumerate() {
            T::store(cell, f(i));
        }
    }

    /// Copy the current contents out
    pub fn to_vec(&self) -> Vec<T> {
        self.inner.cells.iter().map(T::load).collect()
    }
}

impl<T: Element> std::fmt::Debug for PartitionedArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartitionedArray")
            .field("dtype", &T::DTYPE)
            .field("len", &self.len())
            .field("shard_size", &self.inner.dist.shard_size())
            .finish()
    }
}

/// One reduction slot per unit
///
/// Each unit writes only its own slot, so the hot loop needs no
/// synchronization. After a barrier a single unit combines all P slots
/// serially.
#[derive(Clone, Debug)]
pub struct PartialResult<T: Element> {
    slots: PartitionedArray<T>,
}

impl<T: Element> PartialResult<T> {
    pub(crate) fn new(slots: PartitionedArray<T>) -> Self {
        Self { slots }
    }

    /// Store this unit's contribution
    #[inline]
    pub fn set(&self, unit: &Unit<'_>, value: T) {
        self.slots.set(unit.rank(), value)
    }

    /// Read the contribution of unit `rank`
    #[inline]
    pub fn get(&self, rank: usize) -> T {
        self.slots.get(rank)
    }

    /// Sum every slot in rank order
    pub fn combine(&self) -> T {
        (0..self.slots.len()).fold(T::zero(), |acc, rank| acc.wrapping_add(self.slots.get(rank)))
    }

    /// Give back the slot array so it can be freed collectively
    pub fn into_array(self) -> PartitionedArray<T> {
        self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_is_zeroed() {
        let a = PartitionedArray::<f64>::allocate(10, 3).unwrap();
        assert_eq!(a.len(), 10);
        assert_eq!(a.distribution().shard_size(), 4);
        assert!(a.to_vec().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_allocate_refuses_impossible_size() {
        assert!(PartitionedArray::<i32>::allocate(usize::MAX, 1).is_none());
    }

    #[test]
    fn test_fill_and_read() {
        let a = PartitionedArray::<i32>::allocate(5, 2).unwrap();
        a.fill_with(|i| i as i32 * 10);
        assert_eq!(a.to_vec(), vec![0, 10, 20, 30, 40]);
        a.set(2, -1);
        assert_eq!(a.get(2), -1);
    }

    #[test]
    fn test_partial_combine_wraps() {
        let slots = PartitionedArray::<i32>::allocate(2, 2).unwrap();
        slots.set(0, i32::MAX);
        slots.set(1, 1);
        assert_eq!(PartialResult::new(slots).combine(), i32::MIN);
    }
}
