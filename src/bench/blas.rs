//! Dense kernel drivers

use super::{BenchConfig, Measurement, Operation, Outcome, complete, spmd};
use crate::dense::{axpy, dot, matvec, norm, scal};
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::runtime::{PartitionedArray, Team, Unit, overhead};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use std::time::Instant;

pub(super) fn run<T: Element>(
    team: &Team,
    config: &BenchConfig,
    op: Operation,
    rng: &Mutex<StdRng>,
) -> Result<Outcome> {
    let n = config.size;
    let (label, measured) = match op {
        Operation::DotProduct => ("Dot product", spmd(team, |unit| dot_product::<T>(unit, n, rng))?),
        Operation::ScalarMult => (
            "Scalar multiplication",
            spmd(team, |unit| scalar_mult::<T>(unit, n, rng))?,
        ),
        Operation::Norm => ("Vector norm", spmd(team, |unit| vector_norm::<T>(unit, n, rng))?),
        Operation::Axpy => ("AXPY", spmd(team, |unit| vector_axpy::<T>(unit, n, rng))?),
        Operation::DmatvecProduct => (
            "Dense matrix-vector product",
            spmd(team, |unit| dense_matvec::<T>(unit, n, rng))?,
        ),
        other => {
            return Err(Error::invalid_argument(
                "op",
                format!("'{other}' is not a dense kernel"),
            ));
        }
    };
    Ok(complete(config, label, op, T::DTYPE, measured))
}

/// Coordinator fills every array from the generator, then all units meet
fn seed<T: Element>(unit: &Unit<'_>, rng: &Mutex<StdRng>, arrays: &[&PartitionedArray<T>]) {
    if unit.is_coordinator() {
        let mut rng = rng.lock();
        for array in arrays {
            array.fill_with(|_| T::sample(&mut *rng));
        }
    }
    unit.barrier();
}

/// Probe the overhead of a loop over `array`, then start the clock in step
fn start_clock<T: Element>(unit: &Unit<'_>, array: &PartitionedArray<T>) -> Instant {
    overhead::probe(unit, 0..array.len(), array.distribution());
    unit.barrier();
    Instant::now()
}

fn dot_product<T: Element>(unit: &Unit<'_>, n: usize, rng: &Mutex<StdRng>) -> Result<Measurement> {
    let v1 = unit.all_alloc::<T>(n)?;
    let v2 = unit.all_alloc::<T>(n)?;
    let partials = unit.all_alloc_partials::<T>()?;
    seed(unit, rng, &[&v1, &v2]);

    let start = start_clock(unit, &v1);
    let result = dot(unit, &v1, &v2, &partials)?;
    let elapsed = start.elapsed();

    unit.all_free(partials.into_array());
    unit.all_free(v2);
    unit.all_free(v1);
    Ok(Measurement {
        elapsed,
        sample: result.to_string(),
    })
}

fn scalar_mult<T: Element>(unit: &Unit<'_>, n: usize, rng: &Mutex<StdRng>) -> Result<Measurement> {
    let v = unit.all_alloc::<T>(n)?;
    seed(unit, rng, &[&v]);
    let a = unit.broadcast(|| T::sample(&mut *rng.lock()))?;

    let start = start_clock(unit, &v);
    scal(unit, a, &v);
    let elapsed = start.elapsed();

    let sample = v.get(0).to_string();
    unit.all_free(v);
    Ok(Measurement { elapsed, sample })
}

fn vector_norm<T: Element>(unit: &Unit<'_>, n: usize, rng: &Mutex<StdRng>) -> Result<Measurement> {
    let v = unit.all_alloc::<T>(n)?;
    let partials = unit.all_alloc_partials::<T>()?;
    seed(unit, rng, &[&v]);

    let start = start_clock(unit, &v);
    let result = norm(unit, &v, &partials)?;
    let elapsed = start.elapsed();

    unit.all_free(partials.into_array());
    unit.all_free(v);
    Ok(Measurement {
        elapsed,
        sample: result.to_string(),
    })
}

fn vector_axpy<T: Element>(unit: &Unit<'_>, n: usize, rng: &Mutex<StdRng>) -> Result<Measurement> {
    let x = unit.all_alloc::<T>(n)?;
    let y = unit.all_alloc::<T>(n)?;
    seed(unit, rng, &[&x, &y]);
    let a = unit.broadcast(|| T::sample(&mut *rng.lock()))?;

    let start = start_clock(unit, &y);
    axpy(unit, a, &x, &y)?;
    let elapsed = start.elapsed();

    let sample = y.get(0).to_string();
    unit.all_free(y);
    unit.all_free(x);
    Ok(Measurement { elapsed, sample })
}

fn dense_matvec<T: Element>(unit: &Unit<'_>, n: usize, rng: &Mutex<StdRng>) -> Result<Measurement> {
    let len = n
        .checked_mul(n)
        .ok_or(Error::OutOfMemory { size: usize::MAX })?;
    let a = unit.all_alloc::<T>(len)?;
    let x = unit.all_alloc::<T>(n)?;
    let y = unit.all_alloc::<T>(n)?;
    seed(unit, rng, &[&a, &x]);

    let start = start_clock(unit, &y);
    matvec(unit, &a, &x, &y)?;
    let elapsed = start.elapsed();

    let sample = y.get(0).to_string();
    unit.all_free(y);
    unit.all_free(x);
    unit.all_free(a);
    Ok(Measurement { elapsed, sample })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DType;
    use crate::runtime::{COORDINATOR, Team};
    use rand::SeedableRng;

    #[test]
    fn test_seed_is_independent_of_unit_count() {
        let snapshot = |units: usize| {
            let team = Team::new(units).unwrap();
            let rng = Mutex::new(StdRng::seed_from_u64(9));
            team.run(|unit| {
                let v = unit.all_alloc::<i32>(37).unwrap();
                seed(unit, &rng, &[&v]);
                v.to_vec()
            })
            .swap_remove(COORDINATOR)
        };
        assert_eq!(snapshot(1), snapshot(4));
    }

    #[test]
    fn test_every_dense_operation_completes() {
        let config = BenchConfig::default().with_units(3).with_size(31);
        let team = Team::new(3).unwrap();
        let rng = Mutex::new(StdRng::seed_from_u64(1));
        for op in [
            Operation::DotProduct,
            Operation::ScalarMult,
            Operation::Norm,
            Operation::Axpy,
            Operation::DmatvecProduct,
        ] {
            let outcome = run::<f64>(&team, &config, op, &rng).unwrap();
            match outcome {
                Outcome::Completed(report) => {
                    assert_eq!(report.operation, op);
                    assert_eq!(report.dtype, DType::F64);
                    assert!(report.sample.parse::<f64>().is_ok(), "{}", report.sample);
                }
                Outcome::Aborted => panic!("{op} aborted"),
            }
        }
    }

    #[test]
    fn test_sparse_operation_rejected() {
        let config = BenchConfig::default().with_units(1);
        let team = Team::new(1).unwrap();
        let rng = Mutex::new(StdRng::seed_from_u64(1));
        assert!(run::<i32>(&team, &config, Operation::Spmv, &rng).is_err());
    }
}
