//! Benchmark configuration and drivers
//!
//! A driver allocates its operands collectively, seeds them from the shared
//! generator on the coordinator, probes the runtime overhead, then times the
//! kernel between barriers and reports one sample value. Dense and stencil
//! drivers run SPMD on every unit of a [`Team`]; sparse drivers run once,
//! with rayon spreading the kernel over the team's threads.
//!
//! A failed collective allocation ends a dense or stencil run with
//! [`Outcome::Aborted`]. Sparse input and allocation errors are returned as
//! `Err`.

mod blas;
mod report;
mod sparse;
mod stencil;

pub use report::{BenchReport, Outcome, Phase, timed};

use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::runtime::{COORDINATOR, Team, Unit};
use crate::stencil::{Normalization, SWEEPS, StencilShape};
use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info};

/// Default vector length / grid edge
pub const DEFAULT_SIZE: usize = 200;

/// Default generator seed
pub const DEFAULT_SEED: u64 = 1;

/// SpMV repetitions when none are requested
pub const DEFAULT_SPMV_REPS: u64 = 1000;

/// SpGEMM repetitions when none are requested
pub const DEFAULT_SPGEMM_REPS: u64 = 100;

/// Benchmark family
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Benchmark {
    /// Dense vector/matrix kernels and the sparse engine
    #[default]
    BlasOp,
    /// Grid relaxation
    Stencil,
}

impl Benchmark {
    /// Operation run when none is given
    pub fn default_operation(self) -> Operation {
        match self {
            Self::BlasOp => Operation::DotProduct,
            Self::Stencil => Operation::Stencil(StencilShape::default()),
        }
    }

    /// True if `op` belongs to this family
    pub fn supports(self, op: Operation) -> bool {
        matches!(op, Operation::Stencil(_)) == (self == Self::Stencil)
    }
}

impl fmt::Display for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlasOp => write!(f, "blas_op"),
            Self::Stencil => write!(f, "stencil"),
        }
    }
}

impl FromStr for Benchmark {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "blas_op" => Ok(Self::BlasOp),
            "stencil" => Ok(Self::Stencil),
            other => Err(Error::invalid_argument(
                "bench",
                format!("unknown benchmark '{other}', expected blas_op or stencil"),
            )),
        }
    }
}

/// A single kernel to measure
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `Σ v1[i]·v2[i]`
    DotProduct,
    /// `v[i] = a·v[i]`
    ScalarMult,
    /// Dense `y = A·x`
    DmatvecProduct,
    /// Euclidean norm
    Norm,
    /// `y[i] = a·x[i] + y[i]`
    Axpy,
    /// Sparse `b = A·x`, CSR
    Spmv,
    /// Sparse `C = A·B`, CSR times CSC
    Spgemm,
    /// Grid relaxation with the given shape
    Stencil(StencilShape),
}

impl Operation {
    /// True for the kernels of the sparse engine
    pub fn is_sparse(self) -> bool {
        matches!(self, Self::Spmv | Self::Spgemm)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DotProduct => "dot_product",
            Self::ScalarMult => "scalar_mult",
            Self::DmatvecProduct => "dmatvec_product",
            Self::Norm => "norm",
            Self::Axpy => "axpy",
            Self::Spmv => "spmv",
            Self::Spgemm => "spgemm",
            Self::Stencil(shape) => return write!(f, "{shape}"),
        };
        f.write_str(name)
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dot_product" => Ok(Self::DotProduct),
            "scalar_mult" => Ok(Self::ScalarMult),
            "dmatvec_product" => Ok(Self::DmatvecProduct),
            "norm" => Ok(Self::Norm),
            "axpy" => Ok(Self::Axpy),
            "spmv" => Ok(Self::Spmv),
            "spgemm" => Ok(Self::Spgemm),
            other => other.parse().map(Self::Stencil).map_err(|_| {
                Error::invalid_argument(
                    "op",
                    format!(
                        "unknown operation '{other}', expected one of \
                         dot_product|scalar_mult|dmatvec_product|norm|axpy|spmv|spgemm|5|9|19|27"
                    ),
                )
            }),
        }
    }
}

/// Everything one benchmark invocation needs
#[derive(Clone, Debug, PartialEq)]
pub struct BenchConfig {
    /// Benchmark family
    pub benchmark: Benchmark,
    /// Vector length, matrix order or grid edge (halo included)
    pub size: usize,
    /// Sparse repetitions; `None` picks the per-kernel default
    pub reps: Option<u64>,
    /// `None` picks the family's default operation
    pub operation: Option<Operation>,
    /// Element type of the dense and sparse kernels; stencils are always `f64`
    pub dtype: DType,
    /// Number of execution units (P)
    pub units: usize,
    /// Seed of the generator that fills the operands
    pub seed: u64,
    /// CSR text input of the sparse kernels
    pub csr_path: PathBuf,
    /// Matrix Market fallback input of SpGEMM
    pub mtx_path: PathBuf,
    /// Stencil scaling
    pub normalization: Normalization,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            benchmark: Benchmark::default(),
            size: DEFAULT_SIZE,
            reps: None,
            operation: None,
            dtype: DType::default(),
            units: num_cpus::get(),
            seed: DEFAULT_SEED,
            csr_path: PathBuf::from("matrix_in.csr"),
            mtx_path: PathBuf::from("matrix_in.txt"),
            normalization: Normalization::default(),
        }
    }
}

impl BenchConfig {
    /// Set the benchmark family
    pub fn with_benchmark(mut self, benchmark: Benchmark) -> Self {
        self.benchmark = benchmark;
        self
    }

    /// Set the problem size
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Set the sparse repetition count
    pub fn with_reps(mut self, reps: u64) -> Self {
        self.reps = Some(reps);
        self
    }

    /// Set the operation
    pub fn with_operation(mut self, op: Operation) -> Self {
        self.operation = Some(op);
        self
    }

    /// Set the element type
    pub fn with_dtype(mut self, dtype: DType) -> Self {
        self.dtype = dtype;
        self
    }

    /// Set the number of execution units
    pub fn with_units(mut self, units: usize) -> Self {
        self.units = units;
        self
    }

    /// Set the generator seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the CSR input path
    pub fn with_csr_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.csr_path = path.into();
        self
    }

    /// Set the Matrix Market input path
    pub fn with_mtx_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.mtx_path = path.into();
        self
    }

    /// Set the stencil scaling
    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// The operation to run
    pub fn operation(&self) -> Operation {
        self.operation
            .unwrap_or_else(|| self.benchmark.default_operation())
    }

    /// Kernel repetitions inside the timed region
    pub fn reps_for(&self, op: Operation) -> u64 {
        match op {
            Operation::Spmv => self.reps.unwrap_or(DEFAULT_SPMV_REPS),
            Operation::Spgemm => self.reps.unwrap_or(DEFAULT_SPGEMM_REPS),
            Operation::Stencil(_) => SWEEPS as u64,
            _ => 1,
        }
    }

    /// Reject combinations no driver can run
    pub fn validate(&self) -> Result<()> {
        let op = self.operation();
        if !self.benchmark.supports(op) {
            return Err(Error::invalid_argument(
                "op",
                format!("'{op}' is not a {} operation", self.benchmark),
            ));
        }
        if self.units == 0 {
            return Err(Error::invalid_argument("units", "at least one unit is required"));
        }
        match op {
            Operation::Stencil(_) if self.size < 3 => Err(Error::invalid_argument(
                "size",
                format!("a grid needs at least 3 cells per axis, got {}", self.size),
            )),
            _ if !op.is_sparse() && self.size == 0 => {
                Err(Error::invalid_argument("size", "size must be at least 1"))
            }
            _ => Ok(()),
        }
    }
}

/// Run the configured benchmark
pub fn run(config: &BenchConfig) -> Result<Outcome> {
    config.validate()?;
    let op = config.operation();
    let team = Team::new(config.units)?;
    let rng = Mutex::new(StdRng::seed_from_u64(config.seed));

    info!(
        benchmark = %config.benchmark,
        operation = %op,
        dtype = %config.dtype,
        units = config.units,
        size = config.size,
        "starting benchmark"
    );

    match op {
        Operation::Stencil(shape) => stencil::run(&team, config, shape, &rng),
        Operation::Spmv => crate::dispatch_dtype!(config.dtype, T => { sparse::spmv::<T>(&team, config) }),
        Operation::Spgemm => {
            crate::dispatch_dtype!(config.dtype, T => { sparse::spgemm::<T>(&team, config) })
        }
        dense => crate::dispatch_dtype!(config.dtype, T => { blas::run::<T>(&team, config, dense, &rng) }),
    }
}

/// What the coordinator measured in one SPMD run
#[derive(Debug)]
struct Measurement {
    elapsed: Duration,
    sample: String,
}

/// Run `body` on every unit and keep the coordinator's measurement
///
/// `Ok(None)` means a collective allocation failed; the coordinator has
/// already reported it.
fn spmd<F>(team: &Team, body: F) -> Result<Option<Measurement>>
where
    F: Fn(&Unit<'_>) -> Result<Measurement> + Sync,
{
    let mut results = team.run(|unit| {
        let r = body(unit);
        if unit.is_coordinator() {
            if let Err(Error::OutOfMemory { size }) = &r {
                error!(size, units = unit.units(), "cannot allocate shared arrays, abandoning run");
            }
        }
        r
    });

    if results.len() <= COORDINATOR {
        return Err(Error::Runtime("team returned no coordinator result".to_string()));
    }
    match results.swap_remove(COORDINATOR) {
        Ok(m) => Ok(Some(m)),
        Err(Error::OutOfMemory { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

fn complete(
    config: &BenchConfig,
    label: &'static str,
    op: Operation,
    dtype: DType,
    measured: Option<Measurement>,
) -> Outcome {
    match measured {
        Some(m) => Outcome::Completed(report(config, label, op, dtype, m.elapsed, m.sample, Vec::new())),
        None => Outcome::Aborted,
    }
}

fn report(
    config: &BenchConfig,
    label: &'static str,
    op: Operation,
    dtype: DType,
    elapsed: Duration,
    sample: String,
    phases: Vec<Phase>,
) -> BenchReport {
    let reps = config.reps_for(op);
    info!(
        operation = %op,
        dtype = %dtype,
        reps,
        elapsed_s = elapsed.as_secs_f64(),
        sample = %sample,
        "{label}"
    );
    BenchReport {
        label,
        operation: op,
        dtype,
        units: config.units,
        size: config.size,
        reps,
        elapsed,
        sample,
        phases,
    }
}
