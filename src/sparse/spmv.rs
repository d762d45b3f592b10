//! Sparse matrix-vector product

use super::csr::CsrMatrix;
use super::format::SparseStorage;
use crate::dtype::Element;
use crate::error::{Error, Result};
use rayon::prelude::*;

/// `b = A·x` for a CSR matrix
///
/// Every `b[i]` is assigned, so repeated calls give the same result.
/// Rows are split across the rayon pool; integer arithmetic wraps.
pub fn spmv<T: Element>(a: &CsrMatrix<T>, x: &[T], b: &mut [T]) -> Result<()> {
    let [nrows, ncols] = a.shape();

    if x.len() != ncols {
        return Err(Error::ShapeMismatch {
            expected: vec![ncols],
            got: vec![x.len()],
        });
    }
    if b.len() != nrows {
        return Err(Error::ShapeMismatch {
            expected: vec![nrows],
            got: vec![b.len()],
        });
    }

    b.par_iter_mut().enumerate().for_each(|(row, out)| {
        *out = a.row_range(row).fold(T::zero(), |acc, k| {
            acc.wrapping_add(a.values[k].wrapping_mul(x[a.col_indices[k]]))
        });
    });
    Ok(())
}

/// Input vector of the SpMV benchmark: `x[i] = i + 1.5`
pub fn spmv_input<T: Element>(len: usize) -> Result<Vec<T>> {
    try_filled(len, |i| T::from_f64(i as f64 + 1.5))
}

/// Vector of `len` values built by `f`, reporting allocation failure
pub(crate) fn try_filled<T: Element>(len: usize, f: impl FnMut(usize) -> T) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|_| Error::OutOfMemory {
        size: len.saturating_mul(std::mem::size_of::<T>()),
    })?;
    v.extend((0..len).map(f));
    Ok(v)
}
