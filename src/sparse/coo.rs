//! COO (coordinate) matrices and conversion to CSR

use super::csr::CsrMatrix;
use super::format::{SparseFormat, SparseStorage};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};

/// Unordered `(row, col, value)` triplets, as read from an edge list
#[derive(Debug, Clone, PartialEq)]
pub struct CooMatrix<T: Element> {
    pub(crate) row_indices: Vec<usize>,
    pub(crate) col_indices: Vec<usize>,
    pub(crate) values: Vec<T>,
    pub(crate) shape: [usize; 2],
}

impl<T: Element> CooMatrix<T> {
    /// Empty matrix with room for `capacity` entries
    pub fn with_capacity(shape: [usize; 2], capacity: usize) -> Self {
        Self {
            row_indices: Vec::with_capacity(capacity),
            col_indices: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            shape,
        }
    }

    /// Append one entry
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `(row, col)` lies outside the shape.
    pub fn push(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let [nrows, ncols] = self.shape;
        if row >= nrows || col >= ncols {
            return Err(Error::invalid_argument(
                "index",
                format!("({row}, {col}) outside {nrows}x{ncols} matrix"),
            ));
        }
        self.row_indices.push(row);
        self.col_indices.push(col);
        self.values.push(value);
        Ok(())
    }

    /// Row index of each entry
    pub fn row_indices(&self) -> &[usize] {
        &self.row_indices
    }

    /// Column index of each entry
    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    /// Value of each entry
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Convert to CSR
    ///
    /// `row_ptrs` is built by a counting sort over the row index; entries
    /// within a row are then ordered by column. Duplicates are kept.
    pub fn to_csr(&self) -> CsrMatrix<T> {
        let [nrows, _] = self.shape;
        let nnz = self.values.len();

        let mut row_ptrs = vec![0usize; nrows + 1];
        for &row in &self.row_indices {
            row_ptrs[row + 1] += 1;
        }
        for i in 1..=nrows {
            row_ptrs[i] += row_ptrs[i - 1];
        }

        let mut next = row_ptrs.clone();
        let mut order = vec![0usize; nnz];
        for (entry, &row) in self.row_indices.iter().enumerate() {
            order[next[row]] = entry;
            next[row] += 1;
        }
        for row in 0..nrows {
            order[row_ptrs[row]..row_ptrs[row + 1]].sort_by_key(|&e| self.col_indices[e]);
        }

        CsrMatrix {
            col_indices: order.iter().map(|&e| self.col_indices[e]).collect(),
            values: order.iter().map(|&e| self.values[e]).collect(),
            row_ptrs,
            shape: self.shape,
        }
    }
}

impl<T: Element> SparseStorage for CooMatrix<T> {
    fn format(&self) -> SparseFormat {
        SparseFormat::Coo
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
    fn test_to_csr_orders_rows_and_columns() {
        let mut coo = CooMatrix::<i32>::with_capacity([3, 3], 4);
        coo.push(2, 1, 7).unwrap();
        coo.push(0, 2, 3).unwrap();
        coo.push(2, 0, 5).unwrap();
        coo.push(0, 0, 1).unwrap();

        let csr = coo.to_csr();
        assert_eq!(csr.row_ptrs(), &[0, 2, 2, 4]);
        assert_eq!(csr.col_indices(), &[0, 2, 0, 1]);
        assert_eq!(csr.values(), &[1, 3, 5, 7]);
    }

    #[test]
    fn test_push_out_of_bounds() {
        let mut coo = CooMatrix::<f64>::with_capacity([2, 2], 1);
        assert!(coo.push(2, 0, 1.0).is_err());
        assert_eq!(coo.nnz(), 0);
    }
}
