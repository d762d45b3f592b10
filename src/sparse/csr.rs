//! CSR (compressed sparse row) matrices

use super::dense::DenseMatrix;
use super::format::{SparseFormat, SparseStorage};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use std::ops::Range;

/// CSR sparse matrix held in private (per-unit) memory
///
/// `row_ptrs` has `nrows + 1` non-decreasing entries starting at 0 and ending
/// at `nnz`; the entries of row `i` are `col_indices[row_ptrs[i]..row_ptrs[i+1]]`
/// with matching `values`.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix<T: Element> {
    pub(crate) row_ptrs: Vec<usize>,
    pub(crate) col_indices: Vec<usize>,
    pub(crate) values: Vec<T>,
    pub(crate) shape: [usize; 2],
}

impl<T: Element> CsrMatrix<T> {
    /// Create a CSR matrix from components
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - row_ptrs length != nrows + 1
    /// - row_ptrs does not start at 0, decreases, or does not end at nnz
    /// - col_indices and values have different lengths
    /// - a column index is >= ncols
    pub fn new(
        row_ptrs: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<T>,
        shape: [usize; 2],
    ) -> Result<Self> {
        let [nrows, ncols] = shape;
        let nnz = values.len();

        if row_ptrs.len() != nrows + 1 {
            return Err(Error::shape_mismatch(&[nrows + 1], &[row_ptrs.len()]));
        }
        if col_indices.len() != nnz {
            return Err(Error::shape_mismatch(&[nnz], &[col_indices.len()]));
        }
        validate_offsets("row_ptrs", &row_ptrs, nnz)?;
        if let Some(&col) = col_indices.iter().find(|&&c| c >= ncols) {
            return Err(Error::invalid_argument(
                "col_indices",
                format!("column {col} out of range for {ncols} columns"),
            ));
        }

        Ok(Self {
            row_ptrs,
            col_indices,
            values,
            shape,
        })
    }

    /// `n × n` identity
    pub fn identity(n: usize) -> Self {
        Self {
            row_ptrs: (0..=n).collect(),
            col_indices: (0..n).collect(),
            values: vec![T::one(); n],
            shape: [n, n],
        }
    }

    /// Row pointers
    pub fn row_ptrs(&self) -> &[usize] {
        &self.row_ptrs
    }

    /// Column index of each stored entry
    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    /// Value of each stored entry
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Positions of row `row` in `col_indices` / `values`
    #[inline]
    pub fn row_range(&self, row: usize) -> Range<usize> {
        self.row_ptrs[row]..self.row_ptrs[row + 1]
    }

    /// Expand to a dense matrix; duplicate entries are summed
    pub fn to_dense(&self) -> DenseMatrix<T> {
        let [nrows, ncols] = self.shape;
        let mut dense: DenseMatrix<T> = DenseMatrix::zeros(nrows, ncols);
        for row in 0..nrows {
            for k in self.row_range(row) {
                let col = self.col_indices[k];
                let v = dense.get(row, col).wrapping_add(self.values[k]);
                dense.set(row, col, v);
            }
        }
        dense
    }
}

impl<T: Element> SparseStorage for CsrMatrix<T> {
    fn format(&self) -> SparseFormat {
        SparseFormat::Csr
    }

    fn shape(&self) -> [usize; 2] {
        self.shape
    }

    fn nnz(&self) -> usize {
        self.values.len()
    }

    fn dtype(&self) -> DType {
        T::DTYPE
    }
}

/// Check a compressed offset array: starts at 0, non-decreasing, ends at `nnz`
pub(crate) fn validate_offsets(arg: &'static str, ptrs: &[usize], nnz: usize) -> Result<()> {
    if ptrs.first().copied().unwrap_or(0) != 0 {
        return Err(Error::invalid_argument(arg, "first offset must be 0"));
    }
    if let Some(pos) = ptrs.windows(2).position(|w| w[0] > w[1]) {
        return Err(Error::invalid_argument(
            arg,
            format!("offsets decrease at position {}", pos + 1),
        ));
    }
    let last = ptrs.last().copied().unwrap_or(0);
    if last != nnz {
        return Err(Error::invalid_argument(
            arg,
            format!("last offset is {last}, expected nnz = {nnz}"),
        ));
    }
    Ok(())
}
