//! Sparse matrix-matrix product into a dense result

use super::csc::CscMatrix;
use super::csr::CsrMatrix;
use super::dense::DenseMatrix;
use super::format::SparseStorage;
use crate::dtype::Element;
use crate::error::{Error, Result};
use rayon::prelude::*;

/// `C = A·B` with `A` in CSR and `B` in CSC
///
/// For each column `j` of `B` the column is scattered into a dense scratch
/// vector of length `B.nrows`, then every row of `A` is dotted against it.
/// Columns of `C` are independent and run in parallel, each worker keeping
/// its own scratch vector. `C` is overwritten, not accumulated into.
pub fn spgemm<T: Element>(a: &CsrMatrix<T>, b: &CscMatrix<T>, c: &mut DenseMatrix<T>) -> Result<()> {
    let [m, k] = a.shape();
    let [kb, n] = b.shape();

    if k != kb {
        return Err(Error::ShapeMismatch {
            expected: vec![m, k],
            got: vec![kb, n],
        });
    }
    if c.nrows() != m || c.ncols() != n {
        return Err(Error::ShapeMismatch {
            expected: vec![m, n],
            got: vec![c.nrows(), c.ncols()],
        });
    }
    if m == 0 || n == 0 {
        return Ok(());
    }

    c.data.par_chunks_mut(m).enumerate().for_each_init(
        || vec![T::zero(); kb],
        |scratch, (j, column)| {
            let entries = b.col_range(j);
            for p in entries.clone() {
                let r = b.row_indices[p];
                scratch[r] = scratch[r].wrapping_add(b.values[p]);
            }

            for (i, out) in column.iter_mut().enumerate() {
                *out = a.row_range(i).fold(T::zero(), |acc, q| {
                    acc.wrapping_add(a.values[q].wrapping_mul(scratch[a.col_indices[q]]))
                });
            }

            for p in entries {
                scratch[b.row_indices[p]] = T::zero();
            }
        },
    );
    Ok(())
}
