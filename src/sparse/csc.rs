//! CSC (compressed sparse column) matrices

use super::csr::{CsrMatrix, validate_offsets};
use super::format::{SparseFormat, SparseStorage};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use std::ops::Range;

/// CSC sparse matrix, the column-major mirror of [`CsrMatrix`]
#[derive(Debug, Clone, PartialEq)]
pub struct CscMatrix<T: Element> {
    pub(crate) col_ptrs: Vec<usize>,
    pub(crate) row_indices: Vec<usize>,
    pub(crate) values: Vec<T>,
    pub(crate) shape: [usize; 2],
}

impl<T: Element> CscMatrix<T> {
    /// Create a CSC matrix from components
    ///
    /// # Errors
    ///
    /// Same checks as [`CsrMatrix::new`] with rows and columns swapped.
    pub fn new(
        col_ptrs: Vec<usize>,
        row_indices: Vec<usize>,
        values: Vec<T>,
        shape: [usize; 2],
    ) -> Result<Self> {
        let [nrows, ncols] = shape;
        let nnz = values.len();

        if col_ptrs.len() != ncols + 1 {
            return Err(Error::shape_mismatch(&[ncols + 1], &[col_ptrs.len()]));
        }
        if row_indices.len() != nnz {
            return Err(Error::shape_mismatch(&[nnz], &[row_indices.len()]));
        }
        validate_offsets("col_ptrs", &col_ptrs, nnz)?;
        if let Some(&row) = row_indices.iter().find(|&&r| r >= nrows) {
            return Err(Error::invalid_argument(
                "row_indices",
                format!("row {row} out of range for {nrows} rows"),
            ));
        }

        Ok(Self {
            col_ptrs,
            row_indices,
            values,
            shape,
        })
    }

    /// Transpose the storage of a CSR matrix
    ///
    /// Counting sort over column index: O(nnz + ncols). Row indices come out
    /// ascending within each column because rows are visited in order.
    pub fn from_csr(csr: &CsrMatrix<T>) -> Self {
        let [nrows, ncols] = csr.shape;
        let nnz = csr.values.len();

        let mut col_ptrs = vec![0usize; ncols + 1];
        for &col in &csr.col_indices {
            col_ptrs[col + 1] += 1;
        }
        for j in 1..=ncols {
            col_ptrs[j] += col_ptrs[j - 1];
        }

        let mut next = col_ptrs.clone();
        let mut row_indices = vec![0usize; nnz];
        let mut values = vec![T::zero(); nnz];
        for row in 0..nrows {
            for k in csr.row_range(row) {
                let col = csr.col_indices[k];
                let dst = next[col];
                row_indices[dst] = row;
                values[dst] = csr.values[k];
                next[col] += 1;
            }
        }

        Self {
            col_ptrs,
            row_indices,
            values,
            shape: csr.shape,
        }
    }

    /// Column pointers
    pub fn col_ptrs(&self) -> &[usize] {
        &self.col_ptrs
    }

    /// Row index of each stored entry
    pub fn row_indices(&self) -> &[usize] {
        &self.row_indices
    }

    /// Value of each stored entry
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Positions of column `col` in `row_indices` / `values`
    #[inline]
    pub fn col_range(&self, col: usize) -> Range<usize> {
        self.col_ptrs[col]..self.col_ptrs[col + 1]
    }
}

impl<T: Element> SparseStorage for CscMatrix<T> {
    fn format(&self) -> SparseFormat {
        SparseFormat::Csc
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_csr() {
        // [1, 0, 2]
        // [0, 3, 0]
        // [4, 0, 5]
        let csr = CsrMatrix::new(
            vec![0, 2, 3, 5],
            vec![0, 2, 1, 0, 2],
            vec![1, 2, 3, 4, 5],
            [3, 3],
        )
        .unwrap();

        let csc = CscMatrix::from_csr(&csr);
        assert_eq!(csc.col_ptrs(), &[0, 2, 3, 5]);
        assert_eq!(csc.row_indices(), &[0, 2, 1, 0, 2]);
        assert_eq!(csc.values(), &[1, 4, 3, 2, 5]);
        assert_eq!(csc.format(), SparseFormat::Csc);
    }

    #[test]
    fn test_from_csr_empty_columns() {
        let csr = CsrMatrix::new(vec![0, 1, 1], vec![3], vec![2.0f64], [2, 4]).unwrap();
        let csc = CscMatrix::from_csr(&csr);
        assert_eq!(csc.col_ptrs(), &[0, 0, 0, 0, 1]);
        assert_eq!(csc.col_range(3), 0..1);
        assert!(CscMatrix::new(csc.col_ptrs.clone(), vec![5], vec![2.0], [2, 4]).is_err());
    }
}
