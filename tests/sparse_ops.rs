//! Integration tests for the sparse engine and the sparse drivers

mod common;

use common::assert_allclose_f64;
use parbench::bench::{self, BenchConfig, Operation, Outcome};
use parbench::dtype::DType;
use parbench::error::Error;
use parbench::sparse::{
    CscMatrix, CsrMatrix, DenseMatrix, SparseStorage, parse_matrix_market, read_csr, spgemm, spmv,
    spmv_input, write_csr,
};

// [ 4 -1  0  0  0]
// [-1  4 -1  0  0]
// [ 0 -1  4 -1  0]
// [ 0  0 -1  4 -1]
// [ 0  0  0 -1  4]
const TRIDIAGONAL: &str = "%%MatrixMarket matrix coordinate real symmetric\n\
                           5 5 9\n\
                           1 1 4\n2 1 -1\n2 2 4\n3 2 -1\n3 3 4\n4 3 -1\n4 4 4\n5 4 -1\n5 5 4\n";

fn tridiagonal() -> CsrMatrix<f64> {
    parse_matrix_market(TRIDIAGONAL).unwrap().to_csr()
}

#[test]
fn test_edge_list_reconstructs_pattern() {
    let a = tridiagonal();
    assert_eq!(a.nnz(), 13);
    assert_eq!(a.row_ptrs(), &[0, 2, 5, 8, 11, 13]);

    let dense = a.to_dense();
    let expected: Vec<(usize, usize)> = (0..5usize)
        .flat_map(|i| (0..5usize).map(move |j| (i, j)))
        .filter(|&(i, j)| i.abs_diff(j) <= 1)
        .collect();
    assert_eq!(dense.nonzero_pattern(), expected);
}

#[test]
fn test_spmv_tridiagonal() {
    let a = tridiagonal();
    let x = spmv_input::<f64>(5).unwrap();
    let mut b = vec![0.0; 5];
    spmv(&a, &x, &mut b).unwrap();
    // x = 1.5, 2.5, 3.5, 4.5, 5.5
    assert_allclose_f64(&b, &[3.5, 5.0, 7.0, 9.0, 17.5], 1e-12, 0.0, "spmv");
}

#[test]
fn test_symmetric_csc_equals_csr() {
    let a = tridiagonal();
    let b = CscMatrix::from_csr(&a);
    assert_eq!(b.col_ptrs(), a.row_ptrs());
    assert_eq!(b.row_indices(), a.col_indices());
    assert_eq!(b.values(), a.values());
}

#[test]
fn test_spgemm_square_of_tridiagonal() {
    let a = tridiagonal();
    let b = CscMatrix::from_csr(&a);
    let mut c = DenseMatrix::zeros(5, 5);
    spgemm(&a, &b, &mut c).unwrap();

    assert_eq!(c.get(0, 0), 17.0);
    assert_eq!(c.get(2, 2), 18.0);
    assert_eq!(c.get(0, 1), -8.0);
    assert_eq!(c.get(0, 2), 1.0);
    assert_eq!(c.get(0, 3), 0.0);
}

#[test]
fn test_spmv_driver_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let csr_path = dir.path().join("matrix_in.csr");
    write_csr(&csr_path, &tridiagonal()).unwrap();
    assert_eq!(read_csr::<f64>(&csr_path).unwrap(), tridiagonal());

    let config = BenchConfig::default()
        .with_operation(Operation::Spmv)
        .with_dtype(DType::F64)
        .with_units(2)
        .with_reps(4)
        .with_csr_path(&csr_path);
    match bench::run(&config).unwrap() {
        Outcome::Completed(report) => {
            assert_eq!(report.reps, 4);
            assert_eq!(report.sample, "3.5");
        }
        Outcome::Aborted => panic!("spmv aborted"),
    }
}

#[test]
fn test_spgemm_driver_prefers_cached_csr() {
    let dir = tempfile::tempdir().unwrap();
    let csr_path = dir.path().join("matrix_in.csr");
    let mtx_path = dir.path().join("matrix_in.txt");
    write_csr(&csr_path, &CsrMatrix::<i32>::identity(3)).unwrap();
    std::fs::write(&mtx_path, "not a matrix").unwrap();

    let config = BenchConfig::default()
        .with_operation(Operation::Spgemm)
        .with_units(2)
        .with_reps(2)
        .with_csr_path(&csr_path)
        .with_mtx_path(&mtx_path);
    match bench::run(&config).unwrap() {
        Outcome::Completed(report) => {
            assert_eq!(report.sample, "1");
            assert_eq!(report.phases[0].label, "Read in CSR file");
        }
        Outcome::Aborted => panic!("spgemm aborted"),
    }
}

#[test]
fn test_sparse_driver_missing_input_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = BenchConfig::default()
        .with_operation(Operation::Spgemm)
        .with_units(1)
        .with_csr_path(dir.path().join("absent.csr"))
        .with_mtx_path(dir.path().join("absent.txt"));
    assert!(matches!(bench::run(&config), Err(Error::Io { .. })));
}

#[test]
fn test_malformed_csr_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("matrix_in.csr");
    std::fs::write(&path, "2 2 3\n1.0\n2.0\n0\n1\n0\n1\n5\n").unwrap();
    let err = read_csr::<f64>(&path).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { arg: "row_ptrs", .. }), "{err}");
}
