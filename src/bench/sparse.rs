//! Sparse kernel drivers
//!
//! Input problems are fatal here: a missing file, a malformed matrix or a
//! failed allocation is returned as `Err` and ends the process.

use super::{BenchConfig, Operation, Outcome, Phase, report, timed};
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::runtime::Team;
use crate::sparse::{
    CscMatrix, DenseMatrix, SparseStorage, read_csr, read_matrix_market,
    spgemm as spgemm_kernel, spmv as spmv_kernel, spmv_input, try_filled,
};
use tracing::{debug, info};

pub(super) fn spmv<T: Element>(team: &Team, config: &BenchConfig) -> Result<Outcome> {
    let op = Operation::Spmv;
    let reps = config.reps_for(op);

    let (a, read) = timed(|| read_csr::<T>(&config.csr_path));
    let a = a?;
    log_matrix(&a);

    let x = spmv_input::<T>(a.ncols())?;
    let mut b = try_filled(a.nrows(), |_| T::zero())?;

    let (result, elapsed) = timed(|| {
        team.install(|| {
            for _ in 0..reps {
                spmv_kernel(&a, &x, &mut b)?;
            }
            Ok::<_, Error>(())
        })
    });
    result?;

    let sample = b.first().map(ToString::to_string).unwrap_or_default();
    let phases = vec![Phase {
        label: "Read in CSR file",
        elapsed: read,
    }];
    Ok(Outcome::Completed(report(
        config,
        "Sparse DMVs",
        op,
        T::DTYPE,
        elapsed,
        sample,
        phases,
    )))
}

pub(super) fn spgemm<T: Element>(team: &Team, config: &BenchConfig) -> Result<Outcome> {
    let op = Operation::Spgemm;
    let reps = config.reps_for(op);
    let mut phases = Vec::with_capacity(3);

    let a = if config.csr_path.exists() {
        info!(path = %config.csr_path.display(), "reading cached CSR matrix");
        let (a, elapsed) = timed(|| read_csr::<T>(&config.csr_path));
        phases.push(Phase {
            label: "Read in CSR file",
            elapsed,
        });
        a?
    } else {
        info!(path = %config.mtx_path.display(), "converting Matrix Market input");
        let (a, elapsed) = timed(|| read_matrix_market::<T>(&config.mtx_path));
        phases.push(Phase {
            label: "MM to CSR conversion",
            elapsed,
        });
        a?
    };
    log_matrix(&a);

    let (b, elapsed) = timed(|| CscMatrix::from_csr(&a));
    phases.push(Phase {
        label: "CSR to CSC",
        elapsed,
    });
    log_matrix(&b);
    let mut c = DenseMatrix::try_zeros(a.nrows(), b.ncols())?;

    let (result, elapsed) = timed(|| {
        team.install(|| {
            for _ in 0..reps {
                spgemm_kernel(&a, &b, &mut c)?;
            }
            Ok::<_, Error>(())
        })
    });
    result?;

    let sample = if c.nrows() > 0 && c.ncols() > 0 {
        c.get(0, 0).to_string()
    } else {
        String::new()
    };
    Ok(Outcome::Completed(report(
        config,
        "Sparse DGEMMs",
        op,
        T::DTYPE,
        elapsed,
        sample,
        phases,
    )))
}

fn log_matrix(a: &impl SparseStorage) {
    debug!(
        format = %a.format(),
        dtype = %a.dtype(),
        rows = a.nrows(),
        cols = a.ncols(),
        nnz = a.nnz(),
        density = a.density(),
        "sparse matrix ready"
    );
}
