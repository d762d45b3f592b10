//! Dot product

use super::validate_same_len;
use crate::dtype::Element;
use crate::error::Result;
use crate::runtime::{PartialResult, PartitionedArray, Unit};

/// `Σ v1[i] · v2[i]`, returned on every unit
///
/// Each unit accumulates its owned indices into its own partial slot; the
/// coordinator sums the slots once every unit has published.
pub fn dot<T: Element>(
    unit: &Unit<'_>,
    v1: &PartitionedArray<T>,
    v2: &PartitionedArray<T>,
    partials: &PartialResult<T>,
) -> Result<T> {
    validate_same_len(v1, v2)?;

    let mut acc = T::zero();
    unit.forall(0..v1.len(), v1.distribution(), |i| {
        acc = acc.wrapping_add(v1.get(i).wrapping_mul(v2.get(i)));
    });
    partials.set(unit, acc);

    // broadcast opens with a barrier, so every slot is published
    unit.broadcast(|| partials.combine())
}
