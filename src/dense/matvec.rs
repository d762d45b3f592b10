//! Dense matrix-vector product

use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::runtime::{PartitionedArray, Unit};

/// `y = A · x` for a square row-major `n × n` matrix
///
/// Owner-computes over `y`: the owner of `y[i]` computes the whole of row `i`,
/// reading `A` and `x` wherever they live. `O(n²)` work and deliberately
/// communication-heavy, since rows of `A` are not aligned with `y`'s shards.
pub fn matvec<T: Element>(
    unit: &Unit<'_>,
    a: &PartitionedArray<T>,
    x: &PartitionedArray<T>,
    y: &PartitionedArray<T>,
) -> Result<()> {
    let n = x.len();
    if y.len() != n {
        return Err(Error::shape_mismatch(&[n], &[y.len()]));
    }
    check_square(n, a.len())?;

    unit.forall(0..n, y.distribution(), |i| {
        let row = i * n;
        let mut acc = T::zero();
        for j in 0..n {
            acc = acc.wrapping_add(a.get(row + j).wrapping_mul(x.get(j)));
        }
        y.set(i, acc);
    });
    unit.barrier();
    Ok(())
}

/// `len` must hold exactly `n × n` elements
fn check_square(n: usize, len: usize) -> Result<()> {
    if n.checked_mul(n) != Some(len) {
        return Err(Error::shape_mismatch(&[n, n], &[len]));
    }
    Ok(())
}
