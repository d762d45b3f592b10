//! Scalar multiplication

use crate::dtype::Element;
use crate::runtime::{PartitionedArray, Unit};

/// `v[i] = a · v[i]` in place
///
/// `a` must be the same on every unit; drivers obtain it with
/// [`Unit::broadcast`].
pub fn scal<T: Element>(unit: &Unit<'_>, a: T, v: &PartitionedArray<T>) {
    unit.forall(0..v.len(), v.distribution(), |i| {
        v.set(i, a.wrapping_mul(v.get(i)));
    });
    unit.barrier();
}
