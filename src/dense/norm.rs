//! Euclidean norm

use crate::dtype::Element;
use crate::error::Result;
use crate::runtime::{PartialResult, PartitionedArray, Unit};

/// `sqrt(Σ v[i]²)`, returned on every unit
///
/// The square root is taken once, by the coordinator, on the combined sum. For
/// integers the sum wraps and the root is truncated.
pub fn norm<T: Element>(
    unit: &Unit<'_>,
    v: &PartitionedArray<T>,
    partials: &PartialResult<T>,
) -> Result<T> {
    let mut acc = T::zero();
    unit.forall(0..v.len(), v.distribution(), |i| {
        let x = v.get(i);
        acc = acc.wrapping_add(x.wrapping_mul(x));
    });
    partials.set(unit, acc);

    unit.broadcast(|| partials.combine().sqrt())
}
