//! Dense vector and matrix kernels
//!
//! Every kernel is collective: all units call it with handles to the same
//! arrays, each unit touches only the indices it owns, and the kernel returns
//! after a barrier so its writes are visible to every unit.
//!
//! | kernel     | operation                       | reduction |
//! |------------|---------------------------------|-----------|
//! | [`dot`]    | `Σ v1[i]·v2[i]`                 | yes       |
//! | [`scal`]   | `v[i] = a·v[i]`                 | no        |
//! | [`norm`]   | `sqrt(Σ v[i]²)`                 | yes       |
//! | [`axpy`]   | `y[i] = a·x[i] + y[i]`          | no        |
//! | [`matvec`] | `y[i] = Σⱼ A[i,j]·x[j]`         | no        |
//!
//! Reductions use a [`PartialResult`](crate::runtime::PartialResult): one slot
//! per unit, summed serially by the coordinator after a barrier.

mod axpy;
mod dot;
mod matvec;
mod norm;
mod scal;

pub use axpy::axpy;
pub use dot::dot;
pub use matvec::matvec;
pub use norm::norm;
pub use scal::scal;

use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::runtime::PartitionedArray;

/// Check that two operands have the same length
pub(crate) fn validate_same_len<T: Element>(
    lhs: &PartitionedArray<T>,
    rhs: &PartitionedArray<T>,
) -> Result<()> {
    if lhs.len() != rhs.len() {
        return Err(Error::shape_mismatch(&[lhs.len()], &[rhs.len()]));
    }
    Ok(())
}
