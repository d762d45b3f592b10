//! AXPY

use super::validate_same_len;
use crate::dtype::Element;
use crate::error::Result;
use crate::runtime::{PartitionedArray, Unit};

/// `y[i] = a · x[i] + y[i]`
///
/// Purely element-local: `y` is distributed like `x` and each unit updates the
/// indices of `y` it owns.
pub fn axpy<T: Element>(
    unit: &Unit<'_>,
    a: T,
    x: &PartitionedArray<T>,
    y: &PartitionedArray<T>,
) -> Result<()> {
    validate_same_len(x, y)?;

    unit.forall(0..y.len(), y.distribution(), |i| {
        y.set(i, a.wrapping_mul(x.get(i)).wrapping_add(y.get(i)));
    });
    unit.barrier();
    Ok(())
}
