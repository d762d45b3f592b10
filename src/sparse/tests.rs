//! Tests for the sparse engine across formats

use super::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random `n × n` edge list in Matrix Market text, plus its dense pattern
fn random_edge_list(n: usize, entries: usize, seed: u64) -> (String, Vec<(usize, usize)>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut seen = std::collections::BTreeSet::new();
    while seen.len() < entries {
        seen.insert((rng.random_range(0..n), rng.random_range(0..n)));
    }

    let mut text = format!("%%MatrixMarket matrix coordinate real general\n{n} {n} {entries}\n");
    for &(r, c) in &seen {
        text.push_str(&format!("{} {} {}.0\n", r + 1, c + 1, r * n + c + 1));
    }
    (text, seen.into_iter().collect())
}

#[test]
fn test_edge_list_round_trip() {
    let (text, pattern) = random_edge_list(20, 60, 7);
    let csr = parse_matrix_market::<f64>(&text).unwrap().to_csr();
    assert_eq!(csr.nnz(), 60);

    let dense = csr.to_dense();
    assert_eq!(dense.nonzero_pattern(), pattern);
    for &(r, c) in &pattern {
        assert_eq!(dense.get(r, c), (r * 20 + c + 1) as f64);
    }
}

#[test]
fn test_identity_spmv_returns_input() {
    let n = 17;
    let eye = CsrMatrix::<i32>::identity(n);
    let x = spmv_input::<i32>(n).unwrap();
    let mut b = vec![0; n];
    spmv(&eye, &x, &mut b).unwrap();
    assert_eq!(b, x);

    let eye = CsrMatrix::<f64>::identity(n);
    let x = spmv_input::<f64>(n).unwrap();
    let mut b = vec![0.0; n];
    spmv(&eye, &x, &mut b).unwrap();
    assert_eq!(b, x);
}

#[test]
fn test_csc_matches_dense_columns() {
    let (text, _) = random_edge_list(15, 40, 11);
    let csr = parse_matrix_market::<f32>(&text).unwrap().to_csr();
    let csc = CscMatrix::from_csr(&csr);
    let dense = csr.to_dense();

    assert_eq!(csc.nnz(), csr.nnz());
    for col in 0..15 {
        let mut expected = Vec::new();
        for row in 0..15 {
            let v = dense.get(row, col);
            if v != 0.0 {
                expected.push((row, v));
            }
        }
        let got: Vec<(usize, f32)> = csc
            .col_range(col)
            .map(|k| (csc.row_indices()[k], csc.values()[k]))
            .collect();
        assert_eq!(got, expected, "column {col}");
    }
}

#[test]
fn test_spgemm_matches_dense_product() {
    let n = 12;
    let (text, _) = random_edge_list(n, 30, 3);
    let a = parse_matrix_market::<i32>(&text).unwrap().to_csr();
    let b = CscMatrix::from_csr(&a);
    let mut c = DenseMatrix::zeros(n, n);
    spgemm(&a, &b, &mut c).unwrap();

    let d = a.to_dense();
    for i in 0..n {
        for j in 0..n {
            let expected = (0..n).fold(0i32, |acc, p| acc.wrapping_add(d.get(i, p).wrapping_mul(d.get(p, j))));
            assert_eq!(c.get(i, j), expected, "C[{i},{j}]");
        }
    }
}

#[test]
fn test_csr_file_round_trip() {
    let (text, _) = random_edge_list(10, 25, 5);
    let csr = parse_matrix_market::<f64>(&text).unwrap().to_csr();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("matrix_in.csr");
    write_csr(&path, &csr).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("25 10 11\n"));

    let back = read_csr::<f64>(&path).unwrap();
    assert_eq!(back, csr);
}

#[test]
fn test_matrix_market_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("matrix_in.txt");
    std::fs::write(&path, "% header-less\n2 2 2\n1 2 5\n2 1 6\n").unwrap();

    let csr = read_matrix_market::<i32>(&path).unwrap();
    assert_eq!(csr.row_ptrs(), &[0, 1, 2]);
    assert_eq!(csr.col_indices(), &[1, 0]);
    assert_eq!(csr.values(), &[5, 6]);
    assert_eq!(csr.format(), SparseFormat::Csr);
}
