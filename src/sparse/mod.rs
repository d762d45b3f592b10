//! Sparse kernel engine
//!
//! Matrices here live in ordinary per-unit memory; the kernels use rayon
//! inside one unit rather than the partitioned runtime.
//!
//! # Formats
//!
//! - **COO**: `(row, col, value)` triplets, the landing format of edge lists.
//! - **CSR**: row offsets + column indices + values. Left operand of SpGEMM
//!   and the SpMV matrix.
//! - **CSC**: column offsets + row indices + values, derived from CSR by a
//!   counting-sort transpose. Right operand of SpGEMM.
//!
//! # Usage
//!
//! ```
//! use parbench::sparse::{CscMatrix, CsrMatrix, DenseMatrix, parse_matrix_market, spgemm, spmv};
//!
//! let text = "3 3 3\n1 1 2.0\n2 3 1.0\n3 2 4.0\n";
//! let a: CsrMatrix<f64> = parse_matrix_market(text)?.to_csr();
//!
//! let x = [1.0, 2.0, 3.0];
//! let mut b = [0.0; 3];
//! spmv(&a, &x, &mut b)?;
//! assert_eq!(b, [2.0, 3.0, 8.0]);
//!
//! let bt = CscMatrix::from_csr(&a);
//! let mut c = DenseMatrix::zeros(3, 3);
//! spgemm(&a, &bt, &mut c)?;
//! assert_eq!(c.get(0, 0), 4.0);
//! # Ok::<(), parbench::error::Error>(())
//! ```

mod coo;
mod csc;
mod csr;
mod dense;
mod format;
mod io;
mod spgemm;
mod spmv;

pub use coo::CooMatrix;
pub use csc::CscMatrix;
pub use csr::CsrMatrix;
pub use dense::DenseMatrix;
pub use format::{SparseFormat, SparseStorage};
pub use io::{parse_csr, parse_matrix_market, read_csr, read_matrix_market, write_csr};
pub use spgemm::spgemm;
pub use spmv::{spmv, spmv_input};
pub(crate) use spmv::try_filled;

#[cfg(test)]
mod tests;
