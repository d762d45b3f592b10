//! Stencil driver

use super::{BenchConfig, Measurement, Operation, Outcome, complete, spmd};
use crate::dtype::DType;
use crate::error::Result;
use crate::runtime::{Team, Unit, overhead};
use crate::stencil::{Grid, Normalization, SWEEPS, Stencil, StencilShape};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use std::time::Instant;

pub(super) fn run(
    team: &Team,
    config: &BenchConfig,
    shape: StencilShape,
    rng: &Mutex<StdRng>,
) -> Result<Outcome> {
    let label = match shape {
        StencilShape::Five => "Stencil - 5 point",
        StencilShape::Nine => "Stencil - 9 point",
        StencilShape::Nineteen => "Stencil - 19 point",
        StencilShape::TwentySeven => "Stencil - 27 point",
    };
    let size = config.size;
    let normalization = config.normalization;
    let measured = spmd(team, |unit| relax(unit, shape, normalization, size, rng))?;
    Ok(complete(config, label, Operation::Stencil(shape), DType::F64, measured))
}

fn relax(
    unit: &Unit<'_>,
    shape: StencilShape,
    normalization: Normalization,
    size: usize,
    rng: &Mutex<StdRng>,
) -> Result<Measurement> {
    let grid = Grid::alloc(unit, size, shape.dims())?;
    grid.zero(unit);
    grid.seed(unit, rng);
    let stencil = Stencil::new(shape, normalization, size);

    overhead::probe(unit, 0..grid.len(), grid.current().distribution());
    unit.barrier();
    let start = Instant::now();
    grid.relax(unit, &stencil, SWEEPS);
    let elapsed = start.elapsed();

    let mid = size / 2;
    let sample = grid.current().get(grid.index(mid, mid, mid)).to_string();
    grid.free(unit);
    Ok(Measurement { elapsed, sample })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::Benchmark;
    use rand::SeedableRng;

    #[test]
    fn test_stencil_run_reports_interior_sample() {
        let config = BenchConfig::default()
            .with_benchmark(Benchmark::Stencil)
            .with_units(2)
            .with_size(8);
        let team = Team::new(2).unwrap();
        let rng = Mutex::new(StdRng::seed_from_u64(3));

        for shape in [StencilShape::Five, StencilShape::TwentySeven] {
            match run(&team, &config, shape, &rng).unwrap() {
                Outcome::Completed(report) => {
                    assert_eq!(report.reps, SWEEPS as u64);
                    let v: f64 = report.sample.parse().unwrap();
                    assert!((0.0..1.0).contains(&v), "{shape}: {v}");
                }
                Outcome::Aborted => panic!("{shape} aborted"),
            }
        }
    }
}
