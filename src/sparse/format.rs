//! Storage layouts shared by the sparse kernels

use crate::dtype::DType;
use std::fmt;

/// Layout of a sparse matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SparseFormat {
    /// Unordered `(row, col, value)` triplets, as read from an edge list
    Coo,
    /// Row-compressed; left operand of SpMV and SpGEMM
    Csr,
    /// Column-compressed; right operand of SpGEMM
    Csc,
}

impl fmt::Display for SparseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Coo => "COO",
            Self::Csr => "CSR",
            Self::Csc => "CSC",
        })
    }
}

/// Shape and element information common to every sparse layout
pub trait SparseStorage {
    /// Layout of this matrix
    fn format(&self) -> SparseFormat;

    /// `[nrows, ncols]`
    fn shape(&self) -> [usize; 2];

    /// Stored entries, duplicates included
    fn nnz(&self) -> usize;

    /// Element type of the values
    fn dtype(&self) -> DType;

    /// Row count
    #[inline]
    fn nrows(&self) -> usize {
        self.shape()[0]
    }

    /// Column count
    #[inline]
    fn ncols(&self) -> usize {
        self.shape()[1]
    }

    /// Stored entries over `nrows × ncols`; 0 for an empty shape
    fn density(&self) -> f64 {
        let [nrows, ncols] = self.shape();
        let cells = nrows as f64 * ncols as f64;
        if cells == 0.0 {
            0.0
        } else {
            self.nnz() as f64 / cells
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_labels() {
        assert_eq!(SparseFormat::Coo.to_string(), "COO");
        assert_eq!(SparseFormat::Csr.to_string(), "CSR");
        assert_eq!(SparseFormat::Csc.to_string(), "CSC");
    }
}
