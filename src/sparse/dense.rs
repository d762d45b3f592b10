//! Dense result matrix for SpGEMM

use crate::dtype::Element;
use crate::error::{Error, Result};

/// Dense `nrows × ncols` matrix stored column-major
///
/// Column-major storage gives each SpGEMM output column its own contiguous
/// slice, so columns can be filled in parallel.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<T: Element> {
    pub(crate) data: Vec<T>,
    pub(crate) nrows: usize,
    pub(crate) ncols: usize,
}

impl<T: Element> DenseMatrix<T> {
    /// All-zero matrix
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            data: vec![T::zero(); nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// All-zero matrix, reporting allocation failure instead of aborting
    pub fn try_zeros(nrows: usize, ncols: usize) -> Result<Self> {
        let len = nrows.checked_mul(ncols).ok_or(Error::OutOfMemory { size: usize::MAX })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| Error::OutOfMemory {
            size: len.saturating_mul(std::mem::size_of::<T>()),
        })?;
        data.resize(len, T::zero());
        Ok(Self { data, nrows, ncols })
    }

    /// Number of rows
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Element `(row, col)`
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[col * self.nrows + row]
    }

    /// Overwrite element `(row, col)`
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[col * self.nrows + row] = value;
    }

    /// Column `col` as a slice
    #[inline]
    pub fn column(&self, col: usize) -> &[T] {
        &self.data[col * self.nrows..(col + 1) * self.nrows]
    }

    /// Positions `(row, col)` of every entry that is not zero, row by row
    pub fn nonzero_pattern(&self) -> Vec<(usize, usize)> {
        let mut pattern = Vec::new();
        for row in 0..self.nrows {
            for col in 0..self.ncols {
                if self.get(row, col) != T::zero() {
                    pattern.push((row, col));
                }
            }
        }
        pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_major_layout() {
        let mut m = DenseMatrix::<f64>::zeros(2, 3);
        m.set(1, 2, 5.0);
        m.set(0, 1, 4.0);
        assert_eq!(m.column(2), &[0.0, 5.0]);
        assert_eq!(m.nonzero_pattern(), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn test_try_zeros() {
        let m = DenseMatrix::<i32>::try_zeros(3, 2).unwrap();
        assert_eq!(m, DenseMatrix::zeros(3, 2));
        assert!(matches!(
            DenseMatrix::<f64>::try_zeros(usize::MAX, 2),
            Err(Error::OutOfMemory { .. })
        ));
    }
}
