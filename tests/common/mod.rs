//! Common test utilities
#![allow(dead_code)]

use parbench::runtime::Team;

/// Unit counts exercised by the SPMD tests, including counts that do not
/// divide the test sizes
pub const UNIT_COUNTS: [usize; 4] = [1, 2, 3, 4];

/// Create a team of `units` execution units for testing
pub fn create_team(units: usize) -> Team {
    Team::new(units).expect("failed to start test team")
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Value seen by the coordinator, after checking every unit agrees
pub fn agreed<T: PartialEq + std::fmt::Debug + Clone>(per_unit: &[T]) -> T {
    let first = per_unit[0].clone();
    for (rank, v) in per_unit.iter().enumerate() {
        assert_eq!(v, &first, "unit {rank} disagrees with the coordinator");
    }
    first
}
