//! # parbench
//!
//! **Microbenchmarks for owner-computes parallel kernels.**
//!
//! parbench times elementary numerical kernels on a team of P execution units
//! that share block-distributed arrays: each unit runs the same code, writes
//! only the indices it owns, and meets the others at barriers.
//!
//! ## Kernels
//!
//! - **Dense**: dot product, scalar multiply, Euclidean norm, AXPY, dense
//!   matrix-vector product, for `i32`, `f32` and `f64`
//! - **Stencil**: 5/9-point (2D) and 19/27-point (3D) double-buffered grid
//!   relaxation with a fixed zero halo
//! - **Sparse**: Matrix Market and CSR text ingestion, CSR→CSC, SpMV, SpGEMM
//!
//! ## Quick Start
//!
//! ```
//! use parbench::prelude::*;
//!
//! let team = Team::new(4)?;
//! let sums = team.run(|unit| -> Result<f64> {
//!     let v = unit.all_alloc::<f64>(1000)?;
//!     let partials = unit.all_alloc_partials::<f64>()?;
//!     unit.forall(0..v.len(), v.distribution(), |i| v.set(i, 1.0));
//!     let total = dot(unit, &v, &v, &partials)?;
//!     unit.all_free(partials.into_array());
//!     unit.all_free(v);
//!     Ok(total)
//! });
//! assert!(sums.iter().all(|s| matches!(s, Ok(t) if *t == 1000.0)));
//! # Ok::<(), parbench::error::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bench;
pub mod dense;
pub mod dtype;
pub mod error;
pub mod runtime;
pub mod sparse;
pub mod stencil;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bench::{BenchConfig, BenchReport, Benchmark, Operation, Outcome};
    pub use crate::dense::{axpy, dot, matvec, norm, scal};
    pub use crate::dtype::{DType, Element};
    pub use crate::error::{Error, Result};
    pub use crate::runtime::{BlockDistribution, PartialResult, PartitionedArray, Team, Unit};
    pub use crate::sparse::{CscMatrix, CsrMatrix, DenseMatrix, SparseFormat, SparseStorage};
    pub use crate::stencil::{Grid, Normalization, Stencil, StencilShape};
}
