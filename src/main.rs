//! parbench command line
//!
//! ```bash
//! # 27-point stencil on a 200^3 grid with 8 units
//! parbench -b stencil -u 8
//!
//! # double-precision AXPY on 10^7 elements
//! parbench -b blas_op -o axpy -d double -s 10000000
//!
//! # SpGEMM on matrix_in.csr, or matrix_in.txt if no CSR file exists
//! parbench -o spgemm -d double -r 10
//! ```
//!
//! `RUST_LOG=debug` adds the runtime overhead probes to the log.

use anyhow::{Context, Result};
use clap::Parser;
use parbench::bench::{self, BenchConfig, Benchmark, Operation, Outcome};
use parbench::dtype::DType;
use parbench::stencil::Normalization;
use std::path::PathBuf;

/// Parallel kernel microbenchmarks
#[derive(Parser, Debug)]
#[command(name = "parbench")]
#[command(version)]
struct Args {
    /// Benchmark family: blas_op | stencil
    #[arg(short, long, default_value_t = Benchmark::BlasOp)]
    bench: Benchmark,

    /// Vector length, matrix order or grid edge
    #[arg(short, long, default_value_t = bench::DEFAULT_SIZE)]
    size: usize,

    /// Sparse kernel repetitions [default: 1000 for spmv, 100 for spgemm]
    #[arg(short, long)]
    reps: Option<u64>,

    /// Operation: dot_product | scalar_mult | dmatvec_product | norm | axpy |
    /// spmv | spgemm for blas_op; 5 | 9 | 19 | 27 for stencil
    /// [default: dot_product or 27]
    #[arg(short, long)]
    op: Option<Operation>,

    /// Element type: int | float | double
    #[arg(short, long, default_value_t = DType::I32)]
    dtype: DType,

    /// Number of execution units [default: logical CPUs]
    #[arg(short, long)]
    units: Option<usize>,

    /// Generator seed
    #[arg(long, default_value_t = bench::DEFAULT_SEED)]
    seed: u64,

    /// CSR input of the sparse kernels
    #[arg(long, default_value = "matrix_in.csr")]
    csr: PathBuf,

    /// Matrix Market input used by spgemm when the CSR file is absent
    #[arg(long, default_value = "matrix_in.txt")]
    mtx: PathBuf,

    /// Stencil scaling: reference | mean
    #[arg(long, default_value_t = Normalization::Reference)]
    normalization: Normalization,
}

impl Args {
    fn into_config(self) -> BenchConfig {
        let mut config = BenchConfig::default()
            .with_benchmark(self.bench)
            .with_size(self.size)
            .with_dtype(self.dtype)
            .with_seed(self.seed)
            .with_csr_path(self.csr)
            .with_mtx_path(self.mtx)
            .with_normalization(self.normalization);
        if let Some(reps) = self.reps {
            config = config.with_reps(reps);
        }
        if let Some(op) = self.op {
            config = config.with_operation(op);
        }
        if let Some(units) = self.units {
            config = config.with_units(units);
        }
        config
    }
}

fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Args::parse().into_config();
    let op = config.operation();

    match bench::run(&config).with_context(|| format!("benchmark '{op}' failed"))? {
        Outcome::Completed(report) => println!("{report}"),
        Outcome::Aborted => println!("{op}: aborted, shared arrays could not be allocated"),
    }
    Ok(())
}
